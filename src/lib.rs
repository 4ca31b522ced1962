// src/lib.rs

//! Berth installer
//!
//! Relocating installer for self-contained Python runtime bundles. A bundle
//! unpacks to a payload tree plus a `bundle-info.toml`; installing it is a
//! short, blocking, single-threaded pipeline:
//!
//! 1. materialize the payload tree at the chosen directory, preserving
//!    symlink structure;
//! 2. rewrite the build-time placeholder path in every file listed in the
//!    relocation manifest (and optionally shebang lines) so the interpreter
//!    works at its new location;
//! 3. apply platform integrations (registry/COM/PATH on Windows, RUNPATH
//!    rewriting on POSIX) behind a platform adapter chosen once at startup;
//! 4. print post-install guidance: PATH additions, Qt configuration, the
//!    best-guess OpenSSL certificate directory, documentation links.
//!
//! There is no rollback and no persistent state: an interrupted run may
//! leave a partially populated destination, which is an accepted outcome.

pub mod bundle;
pub mod cli;
pub mod commands;
mod error;
pub mod materialize;
pub mod openssl;
pub mod platform;
pub mod prompt;
pub mod qt;
pub mod relocate;
pub mod report;
pub mod tool;

pub use bundle::{BUNDLE_INFO_FILE, Bundle, PAYLOAD_DIR};
pub use commands::{InstallOptions, InstallOutcome};
pub use error::{Error, Result};
pub use materialize::{MaterializeStats, materialize_tree, validate_install_dir};
pub use openssl::SslGuidance;
pub use platform::{IntegrationContext, PlatformIntegration};
pub use relocate::{RelocationSummary, Relocator};
pub use report::InstallReport;
