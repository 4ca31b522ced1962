// src/main.rs

use anyhow::{Context, Result};
use berth::bundle::{BUNDLE_INFO_FILE, Bundle};
use berth::cli::Cli;
use berth::commands::{self, InstallOptions};
use berth::platform;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::warn;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let unpack_dir = resolve_unpack_dir(cli.payload.clone());
    let bundle = Bundle::load(&unpack_dir.join(BUNDLE_INFO_FILE)).with_context(|| {
        format!(
            "no installable bundle found in '{}' (try --payload)",
            unpack_dir.display()
        )
    })?;

    let platform = platform::detect();

    let mut set_root_runpath = cli.set_runpath;
    if set_root_runpath && !bundle.allow_set_runpath {
        warn!("This bundle does not support --set-runpath; ignoring it");
        set_root_runpath = false;
    }

    let opts = InstallOptions {
        use_env_shebang: cli.use_env_shebang,
        set_root_runpath,
        register_components: !cli.no_com_registration,
        update_search_path: !cli.no_path_additions,
    };

    match cli.install_dir {
        Some(install_dir) => {
            let outcome =
                commands::install(&unpack_dir, &bundle, platform.as_ref(), &install_dir, opts)?;
            println!("{}", outcome.report);
        }
        None => {
            if let Some(outcome) =
                commands::interactive_install(&unpack_dir, &bundle, platform.as_ref(), opts)?
            {
                println!("{}", outcome.report);
            }
        }
    }
    Ok(())
}

/// The unpack directory is wherever the bundle landed: an explicit
/// `--payload`, the directory the installer binary sits in, or the current
/// directory as a last resort.
fn resolve_unpack_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            if dir.join(BUNDLE_INFO_FILE).is_file() {
                return dir.to_path_buf();
            }
        }
    }
    PathBuf::from(".")
}
