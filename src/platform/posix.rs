// src/platform/posix.rs

//! POSIX integration: RUNPATH rootification and report fragments.

use super::{IntegrationContext, PlatformIntegration};
use crate::bundle::Bundle;
use crate::error::{Error, Result};
use crate::tool;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct PosixIntegration;

impl PlatformIntegration for PosixIntegration {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn preflight(&self, ctx: &IntegrationContext<'_>) -> Result<()> {
        if ctx.set_root_runpath && which::which("patchelf").is_err() {
            return Err(Error::ToolMissing("patchelf".to_string()));
        }
        Ok(())
    }

    fn apply(&self, ctx: &IntegrationContext<'_>) -> Result<()> {
        if ctx.set_root_runpath {
            info!("Setting RUNPATH of bundled extensions to the root directory");
            rootify_runpath(ctx.install_dir, ctx.bundle)?;
        }
        Ok(())
    }

    fn extra_qt_conf_dirs(&self, install_dir: &Path) -> Vec<PathBuf> {
        vec![install_dir.join("bin")]
    }

    fn qt_note(&self, install_dir: &Path) -> String {
        format!(
            "Qt is bundled with this build, to enable it:\n\n    \
             export LD_LIBRARY_PATH=$LD_LIBRARY_PATH:{}/Qt/lib",
            install_dir.display()
        )
    }

    fn path_guidance(&self, install_dir: &Path) -> String {
        let d = install_dir.display();
        format!("export PATH={d}/bin:{d}/Tools:{d}/Tools/ninja:$PATH")
    }

    fn doc_location(&self, install_dir: &Path, bundle: &Bundle) -> PathBuf {
        bundle.doc_index(install_dir)
    }

    fn wants_ssl_guidance(&self) -> bool {
        true
    }
}

/// Rewrite the RUNPATH of every ELF object under the bundled
/// `site-packages` to `/`, so native extensions resolve libraries from the
/// host root. Requires `patchelf` on PATH.
fn rootify_runpath(install_dir: &Path, bundle: &Bundle) -> Result<()> {
    let patchelf =
        which::which("patchelf").map_err(|_| Error::ToolMissing("patchelf".to_string()))?;

    let site_packages = install_dir
        .join("lib")
        .join(format!("python{}", bundle.python_version))
        .join("site-packages");
    if !site_packages.is_dir() {
        debug!(
            "No site-packages at {}, nothing to patch",
            site_packages.display()
        );
        return Ok(());
    }

    let mut patched = 0usize;
    for entry in WalkDir::new(&site_packages).follow_links(false) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path())?;
        if !is_elf(&bytes) {
            continue;
        }
        let target = entry.path().to_string_lossy();
        tool::run_checked(&patchelf, &["--set-rpath", "/", target.as_ref()])?;
        debug!("Patched RUNPATH of {}", entry.path().display());
        patched += 1;
    }

    info!("Rewrote RUNPATH of {} ELF object(s)", patched);
    Ok(())
}

fn is_elf(bytes: &[u8]) -> bool {
    matches!(goblin::Object::parse(bytes), Ok(goblin::Object::Elf(_)))
}
