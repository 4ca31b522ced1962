// src/commands.rs

//! Install command handlers.
//!
//! The pipeline is a short linear sequence of blocking steps: validate the
//! target, materialize the payload tree, relocate path-dependent files,
//! apply platform integrations, write Qt configuration, compute the OpenSSL
//! guidance, and render the closing report. Nothing runs concurrently and
//! nothing is retried; the first hard failure aborts the remainder.

use crate::bundle::{Bundle, PAYLOAD_DIR};
use crate::materialize::{self, validate_install_dir};
use crate::openssl;
use crate::platform::{IntegrationContext, PlatformIntegration};
use crate::prompt::{Answer, Prompt};
use crate::qt;
use crate::relocate::Relocator;
use crate::report::InstallReport;
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Install toggles, resolved from flags and/or the interactive flow.
#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    pub use_env_shebang: bool,
    pub set_root_runpath: bool,
    pub register_components: bool,
    pub update_search_path: bool,
}

/// What a finished install hands back to the caller.
#[derive(Debug)]
pub struct InstallOutcome {
    pub install_dir: PathBuf,
    pub report: String,
}

/// Interactive entry point: ask for the install directory and the optional
/// features, then run the pipeline. Returns `None` when the user aborts.
pub fn interactive_install(
    unpack_dir: &Path,
    bundle: &Bundle,
    platform: &dyn PlatformIntegration,
    mut opts: InstallOptions,
) -> Result<Option<InstallOutcome>> {
    let prompt = Prompt::detect();

    let install_dir = prompt.ask_install_dir(&bundle.product, &bundle.default_install_dir)?;
    let install_dir = absolutize(&install_dir)?;

    if install_dir.is_dir() {
        println!(
            "\n'{}' already exists. Installing over an existing runtime\n\
             may have unexpected results.",
            install_dir.display()
        );
        if !prompt.ask_yes_no("Proceed?", Some(Answer::No))?.is_yes() {
            println!("Aborting install.");
            return Ok(None);
        }
    } else {
        validate_install_dir(&install_dir)?;
    }

    ask_feature_questions(&prompt, bundle, &mut opts)?;

    println!();
    let outcome = install(unpack_dir, bundle, platform, &install_dir, opts)?;
    Ok(Some(outcome))
}

#[cfg(not(windows))]
fn ask_feature_questions(
    prompt: &Prompt,
    bundle: &Bundle,
    opts: &mut InstallOptions,
) -> Result<()> {
    opts.use_env_shebang = prompt
        .ask_yes_no(
            "Do you want to rewrite the shebang lines of scripts to use /usr/bin/env?",
            Some(Answer::No),
        )?
        .is_yes();

    if bundle.allow_set_runpath {
        opts.set_root_runpath = prompt
            .ask_yes_no(
                "Do you want to set a RUNPATH pointing at the root directory for \
                 site-packages? (patchelf must be installed on your system)",
                Some(Answer::No),
            )?
            .is_yes();
    }
    Ok(())
}

#[cfg(windows)]
fn ask_feature_questions(
    prompt: &Prompt,
    bundle: &Bundle,
    opts: &mut InstallOptions,
) -> Result<()> {
    // A flag the user already switched off on the command line is a
    // conscious decision; only ask about features still switched on.
    if bundle.pywin32 && opts.register_components {
        opts.register_components = prompt
            .ask_yes_no(
                "Do you want to register the bundled COM objects?",
                Some(Answer::Yes),
            )?
            .is_yes();
    }
    if opts.update_search_path {
        opts.update_search_path = prompt
            .ask_yes_no("Do you want to add directories to PATH?", Some(Answer::Yes))?
            .is_yes();
    }
    Ok(())
}

/// Unattended entry point: run the whole pipeline against `install_dir`.
pub fn install(
    unpack_dir: &Path,
    bundle: &Bundle,
    platform: &dyn PlatformIntegration,
    install_dir: &Path,
    opts: InstallOptions,
) -> Result<InstallOutcome> {
    let install_dir = absolutize(install_dir)?;
    validate_install_dir(&install_dir)?;

    let ctx = IntegrationContext {
        install_dir: &install_dir,
        bundle,
        register_components: opts.register_components,
        update_search_path: opts.update_search_path,
        set_root_runpath: opts.set_root_runpath,
    };
    platform.preflight(&ctx)?;

    info!(
        "Installing {} {} to '{}' ({} platform)",
        bundle.product,
        bundle.version,
        install_dir.display(),
        platform.name()
    );
    println!(
        "Installing {} to '{}'...",
        bundle.product,
        install_dir.display()
    );

    materialize::materialize_tree(&unpack_dir.join(PAYLOAD_DIR), &install_dir)?;

    println!("Relocating dir-dependent files...");
    // env-style shebangs only mean something to POSIX script loaders.
    let use_env_shebang = opts.use_env_shebang && !cfg!(windows);
    let relocator =
        Relocator::new(&install_dir, &bundle.placeholder).with_env_shebang(use_env_shebang);
    relocator.run(&install_dir.join(&bundle.relocation_manifest))?;

    platform.apply(&ctx)?;

    let qt_note = qt::configure(&install_dir, platform)?;

    let ssl = if platform.wants_ssl_guidance() {
        Some(openssl::detect())
    } else {
        None
    };
    if let Some(guidance) = &ssl {
        if !guidance.ambiguous.is_empty() {
            warn!(
                "Multiple OpenSSL directories scored equally: {:?}",
                guidance.ambiguous
            );
        }
    }

    let report = InstallReport {
        product: bundle.product.clone(),
        version: bundle.version.clone(),
        install_dir: install_dir.clone(),
        path_guidance: platform.path_guidance(&install_dir),
        qt_note,
        ssl,
        doc_location: platform.doc_location(&install_dir, bundle),
        documentation_url: bundle.documentation_url.clone(),
    };

    Ok(InstallOutcome {
        report: report.to_string(),
        install_dir,
    })
}

/// Anchor relative paths at the current directory. Normalization beyond
/// that is left to the OS; the path need not exist yet.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_keeps_absolute_paths() {
        let p = Path::new("/opt/pyrt");
        assert_eq!(absolutize(p).unwrap(), PathBuf::from("/opt/pyrt"));
    }

    #[test]
    fn test_absolutize_anchors_relative_paths() {
        let abs = absolutize(Path::new("runtime")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("runtime"));
    }
}
