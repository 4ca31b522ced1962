// src/bundle.rs

//! Bundle metadata loading.
//!
//! A distributed runtime bundle unpacks to a directory holding the payload
//! tree (`payload/`) and a `bundle-info.toml` describing it: product name,
//! version, the placeholder path baked into build artifacts, where the
//! relocation manifest lives inside the tree, and which optional install
//! features the bundle supports. The build pipeline writes this file; the
//! installer only consumes it.
//!
//! Everything the install run needs to know about the bundle travels in one
//! explicit `Bundle` value handed to the entry points. There is no
//! process-wide mutable state.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the metadata file next to the payload tree.
pub const BUNDLE_INFO_FILE: &str = "bundle-info.toml";

/// Name of the payload tree inside the unpack directory.
pub const PAYLOAD_DIR: &str = "payload";

fn default_relocation_manifest() -> PathBuf {
    PathBuf::from("lib/reloc.txt")
}

/// Metadata describing one unpacked runtime bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Bundle {
    /// Product name used in prompts and the final report.
    pub product: String,
    /// Bundle version, e.g. "3.8.2.23".
    pub version: String,
    /// Bundled interpreter major.minor, e.g. "3.8". Used for documentation
    /// paths and Windows registry keys.
    pub python_version: String,
    /// Install directory offered when the user gives none.
    pub default_install_dir: PathBuf,
    /// Sentinel path baked into path-dependent payload files at build time.
    pub placeholder: String,
    /// Relocation manifest path, relative to the install directory.
    #[serde(default = "default_relocation_manifest")]
    pub relocation_manifest: PathBuf,
    /// Online documentation root, if the bundle ships one.
    #[serde(default)]
    pub documentation_url: Option<String>,
    /// Whether the RUNPATH rootification option is offered at all.
    #[serde(default)]
    pub allow_set_runpath: bool,
    /// Whether the bundle carries pywin32 (enables COM registration).
    #[serde(default)]
    pub pywin32: bool,
}

impl Bundle {
    /// Load and validate bundle metadata from `bundle-info.toml`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let bundle: Bundle = toml::from_str(&text).map_err(|source| Error::BundleMetadata {
            path: path.to_path_buf(),
            source,
        })?;
        bundle.validate()?;
        debug!(
            "Loaded bundle metadata: {} {} (python {})",
            bundle.product, bundle.version, bundle.python_version
        );
        Ok(bundle)
    }

    /// Sanity-check the metadata before any filesystem mutation.
    fn validate(&self) -> Result<()> {
        if self.placeholder.is_empty() {
            return Err(Error::BundleInvalid("empty placeholder path".to_string()));
        }
        // The default install path has to fit wherever the placeholder was
        // reserved; a bundle violating this could never relocate itself.
        let default_len = self.default_install_dir.as_os_str().len();
        if default_len > self.placeholder.len() {
            return Err(Error::BundleInvalid(format!(
                "default install dir is {} bytes but the placeholder reserves only {}",
                default_len,
                self.placeholder.len()
            )));
        }
        if self.relocation_manifest.is_absolute() {
            return Err(Error::BundleInvalid(format!(
                "relocation manifest path '{}' must be relative",
                self.relocation_manifest.display()
            )));
        }
        Ok(())
    }

    /// Local documentation index for the bundled interpreter version.
    pub fn doc_index(&self, install_dir: &Path) -> PathBuf {
        install_dir
            .join("doc")
            .join(format!("python{}", self.python_version))
            .join("index.html")
    }
}
