// src/error.rs

//! Error types for the berth installer.
//!
//! The taxonomy follows the failure model of a one-shot installer:
//! configuration errors abort before any mutation, I/O errors abort the
//! remaining pipeline (a partially populated destination is an accepted
//! outcome), and advisory lookups never produce an `Error` at all.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The install target exists but is not a directory.
    #[error("cannot install to '{}': exists and is not a directory", .0.display())]
    TargetNotDirectory(PathBuf),

    /// The payload tree to materialize is missing from the unpack directory.
    #[error("payload tree not found at '{}'", .0.display())]
    PayloadMissing(PathBuf),

    /// `bundle-info.toml` was unreadable or did not parse.
    #[error("invalid bundle metadata at '{}'", .path.display())]
    BundleMetadata {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A semantic problem with the bundle metadata values.
    #[error("bundle metadata: {0}")]
    BundleInvalid(String),

    /// A relocation manifest entry resolved outside the install directory.
    #[error("relocation manifest entry '{0}' escapes the install directory")]
    ManifestEscape(String),

    /// The install path does not fit the reserved placeholder width of a
    /// length-sensitive file. Surfaced instead of silently truncating.
    #[error(
        "install path is {} bytes but '{}' reserves only {} placeholder bytes",
        .path_len,
        .file.display(),
        .reserved
    )]
    PlaceholderOverflow {
        file: PathBuf,
        path_len: usize,
        reserved: usize,
    },

    /// A required external tool is not on PATH.
    #[error("required tool '{0}' was not found on PATH")]
    ToolMissing(String),

    /// An external tool ran but failed (non-zero exit or timeout).
    #[error("'{tool}' failed: {detail}")]
    ToolFailed { tool: String, detail: String },

    /// A platform integration step failed.
    #[error("platform integration failed: {0}")]
    Integration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
