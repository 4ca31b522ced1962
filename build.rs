// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("berth")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Berth Contributors")
        .about("Relocating installer for self-contained Python runtime bundles")
        .arg(
            Arg::new("install_dir")
                .short('I')
                .long("install-dir")
                .value_name("DIR")
                .help("Install directory (skips the interactive flow)"),
        )
        .arg(
            Arg::new("payload")
                .long("payload")
                .value_name("DIR")
                .help("Unpack directory holding the payload tree and bundle-info.toml"),
        )
        .arg(
            Arg::new("use_env_shebang")
                .short('e')
                .long("use-env-shebang")
                .action(clap::ArgAction::SetTrue)
                .help("Rewrite script shebangs to use /usr/bin/env (ignored on Windows)"),
        )
        .arg(
            Arg::new("set_runpath")
                .long("set-runpath")
                .action(clap::ArgAction::SetTrue)
                .help("Point the RUNPATH of bundled native extensions at the filesystem root"),
        )
        .arg(
            Arg::new("no_com_registration")
                .short('c')
                .long("no-com-registration")
                .action(clap::ArgAction::SetTrue)
                .help("Do not register COM objects (Windows only)"),
        )
        .arg(
            Arg::new("no_path_additions")
                .short('p')
                .long("no-path-additions")
                .action(clap::ArgAction::SetTrue)
                .help("Do not add directories to PATH (Windows only)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Verbose output"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("berth.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
