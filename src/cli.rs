// src/cli.rs

//! Command-line interface definitions.
//!
//! The actual install logic lives in the `commands` module. Called without
//! `--install-dir` the installer runs interactively; with it the install is
//! unattended.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "berth")]
#[command(author = "Berth Contributors")]
#[command(version)]
#[command(
    about = "Relocating installer for self-contained Python runtime bundles",
    long_about = None
)]
pub struct Cli {
    /// Install directory (skips the interactive flow)
    #[arg(short = 'I', long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Unpack directory holding the payload tree and bundle-info.toml
    /// (defaults to the installer's own directory)
    #[arg(long, value_name = "DIR")]
    pub payload: Option<PathBuf>,

    /// Rewrite script shebangs to use /usr/bin/env (ignored on Windows)
    #[arg(short = 'e', long)]
    pub use_env_shebang: bool,

    /// Point the RUNPATH of bundled native extensions at the filesystem
    /// root (requires patchelf; only honored when the bundle allows it)
    #[arg(long)]
    pub set_runpath: bool,

    /// Do not register COM objects (Windows only)
    #[arg(short = 'c', long)]
    pub no_com_registration: bool,

    /// Do not add directories to PATH (Windows only)
    #[arg(short = 'p', long)]
    pub no_path_additions: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unattended_flags_parse() {
        let cli = Cli::parse_from([
            "berth",
            "-I",
            "/opt/pyrt",
            "-e",
            "--set-runpath",
            "--verbose",
        ]);
        assert_eq!(cli.install_dir, Some(PathBuf::from("/opt/pyrt")));
        assert!(cli.use_env_shebang);
        assert!(cli.set_runpath);
        assert!(cli.verbose);
        assert!(!cli.no_com_registration);
    }

    #[test]
    fn test_defaults_are_interactive() {
        let cli = Cli::parse_from(["berth"]);
        assert!(cli.install_dir.is_none());
        assert!(cli.payload.is_none());
        assert!(!cli.use_env_shebang);
        assert!(!cli.set_runpath);
    }
}
