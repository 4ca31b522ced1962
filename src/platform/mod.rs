// src/platform/mod.rs

//! Platform integration adapters.
//!
//! Everything OS-specific about an install (registry and COM work on
//! Windows, RUNPATH rewriting on POSIX, where extra `qt.conf` copies go,
//! how the final PATH guidance reads) lives behind the
//! [`PlatformIntegration`] trait. The adapter is selected once at startup;
//! the materializer, relocator and ranker never branch on platform.

mod posix;
#[cfg(windows)]
mod windows;

pub use posix::PosixIntegration;
#[cfg(windows)]
pub use windows::WindowsIntegration;

use crate::bundle::Bundle;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Everything an adapter needs to apply its side effects.
pub struct IntegrationContext<'a> {
    pub install_dir: &'a Path,
    pub bundle: &'a Bundle,
    /// Register COM objects (Windows; ignored elsewhere).
    pub register_components: bool,
    /// Add install directories to the user's PATH (Windows; ignored
    /// elsewhere, where PATH guidance is printed instead).
    pub update_search_path: bool,
    /// Point the RUNPATH of bundled native extensions at the filesystem
    /// root (POSIX; ignored elsewhere).
    pub set_root_runpath: bool,
}

/// OS-specific install steps and report fragments.
pub trait PlatformIntegration {
    fn name(&self) -> &'static str;

    /// Validate platform preconditions before the first filesystem
    /// mutation (e.g. required tools for a requested feature).
    fn preflight(&self, ctx: &IntegrationContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Apply the platform's side effects after relocation. Consumes the
    /// final install directory and the toggle flags; advisory sub-steps log
    /// and continue, real failures abort the run.
    fn apply(&self, ctx: &IntegrationContext<'_>) -> Result<()>;

    /// Directories (besides `Qt/bin`) that receive a `qt.conf` copy.
    fn extra_qt_conf_dirs(&self, install_dir: &Path) -> Vec<PathBuf>;

    /// Platform note appended to the report when Qt is bundled.
    fn qt_note(&self, install_dir: &Path) -> String;

    /// How the user should extend their search path.
    fn path_guidance(&self, install_dir: &Path) -> String;

    /// Where the bundled documentation landed.
    fn doc_location(&self, install_dir: &Path, bundle: &Bundle) -> PathBuf;

    /// Whether the final report should carry OpenSSL certificate guidance.
    fn wants_ssl_guidance(&self) -> bool;
}

/// Select the adapter for the running platform.
pub fn detect() -> Box<dyn PlatformIntegration> {
    #[cfg(windows)]
    {
        Box::new(WindowsIntegration::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(PosixIntegration)
    }
}
