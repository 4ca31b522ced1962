// tests/install_flow.rs

//! End-to-end install over a synthetic bundle: materialize, relocate,
//! report.

use berth::bundle::{BUNDLE_INFO_FILE, Bundle};
use berth::commands::{self, InstallOptions};
use berth::platform::PosixIntegration;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PLACEHOLDER: &str = "/tmp/berth-bundle-prefix----------------------------------------";

fn write_bundle(unpack: &Path) {
    fs::write(
        unpack.join(BUNDLE_INFO_FILE),
        format!(
            r#"
            product = "Python Runtime"
            version = "3.8.2"
            python-version = "3.8"
            default-install-dir = "/opt/python-runtime"
            placeholder = "{PLACEHOLDER}"
            documentation-url = "https://docs.example.com/python/3.8"
            "#
        ),
    )
    .unwrap();

    let payload = unpack.join("payload");
    fs::create_dir_all(payload.join("bin")).unwrap();
    fs::create_dir_all(payload.join("lib/python3.8/config")).unwrap();

    fs::write(
        payload.join("bin/pydoc3"),
        format!("#!{PLACEHOLDER}/bin/python3.8\nimport pydoc\npydoc.cli()\n"),
    )
    .unwrap();
    fs::write(
        payload.join("lib/python3.8/config/Makefile"),
        format!("prefix={PLACEHOLDER}\nexec_prefix={PLACEHOLDER}\n"),
    )
    .unwrap();

    let mut blob = b"\x7fELF\x02\x01\x01\0".to_vec();
    blob.extend_from_slice(PLACEHOLDER.as_bytes());
    blob.extend_from_slice(b"/lib\0more\0");
    fs::write(payload.join("lib/libpython3.8.so"), blob).unwrap();

    #[cfg(unix)]
    std::os::unix::fs::symlink("pydoc3", payload.join("bin/pydoc")).unwrap();

    fs::write(
        payload.join("lib/reloc.txt"),
        "bin/pydoc3\nlib/python3.8/config/Makefile\nlib/libpython3.8.so\nbin/not-shipped\n",
    )
    .unwrap();
}

#[test]
fn unattended_install_materializes_and_relocates() {
    let tmp = TempDir::new().unwrap();
    let unpack = tmp.path().join("unpacked");
    fs::create_dir_all(&unpack).unwrap();
    write_bundle(&unpack);

    let bundle = Bundle::load(&unpack.join(BUNDLE_INFO_FILE)).unwrap();
    let install_dir = tmp.path().join("install");

    let opts = InstallOptions {
        use_env_shebang: false,
        set_root_runpath: false,
        register_components: true,
        update_search_path: true,
    };
    let outcome =
        commands::install(&unpack, &bundle, &PosixIntegration, &install_dir, opts).unwrap();
    assert_eq!(outcome.install_dir, install_dir);

    // Text relocation: the real path is in, the placeholder is gone.
    let makefile =
        fs::read_to_string(install_dir.join("lib/python3.8/config/Makefile")).unwrap();
    assert!(!makefile.contains(PLACEHOLDER));
    assert!(makefile.contains(&format!("prefix={}", install_dir.display())));

    let script = fs::read_to_string(install_dir.join("bin/pydoc3")).unwrap();
    assert!(script.starts_with(&format!("#!{}/bin/python3.8", install_dir.display())));

    // Binary relocation kept the length.
    let payload_blob = fs::read(unpack.join("payload/lib/libpython3.8.so")).unwrap();
    let installed_blob = fs::read(install_dir.join("lib/libpython3.8.so")).unwrap();
    assert_eq!(payload_blob.len(), installed_blob.len());
    assert!(
        !installed_blob
            .windows(PLACEHOLDER.len())
            .any(|w| w == PLACEHOLDER.as_bytes())
    );

    // The payload itself is untouched.
    assert!(
        String::from_utf8_lossy(&payload_blob).contains(PLACEHOLDER)
    );

    // Report carries the essentials.
    assert!(outcome.report.contains("Python Runtime 3.8.2"));
    assert!(outcome.report.contains(&install_dir.display().to_string()));
    assert!(outcome.report.contains("export PATH="));
    assert!(outcome.report.contains("web: https://docs.example.com/python/3.8"));
}

#[test]
#[cfg(unix)]
fn unattended_install_preserves_symlinks_and_rewrites_shebangs_on_request() {
    let tmp = TempDir::new().unwrap();
    let unpack = tmp.path().join("unpacked");
    fs::create_dir_all(&unpack).unwrap();
    write_bundle(&unpack);

    let bundle = Bundle::load(&unpack.join(BUNDLE_INFO_FILE)).unwrap();
    let install_dir = tmp.path().join("install");

    let opts = InstallOptions {
        use_env_shebang: true,
        set_root_runpath: false,
        register_components: true,
        update_search_path: true,
    };
    commands::install(&unpack, &bundle, &PosixIntegration, &install_dir, opts).unwrap();

    let link = install_dir.join("bin/pydoc");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_link(&link).unwrap(),
        std::path::PathBuf::from("pydoc3")
    );

    let script = fs::read_to_string(install_dir.join("bin/pydoc3")).unwrap();
    assert!(script.starts_with("#!/usr/bin/env python3.8\n"));
}

#[test]
fn install_target_occupied_by_file_fails_before_copying() {
    let tmp = TempDir::new().unwrap();
    let unpack = tmp.path().join("unpacked");
    fs::create_dir_all(&unpack).unwrap();
    write_bundle(&unpack);

    let bundle = Bundle::load(&unpack.join(BUNDLE_INFO_FILE)).unwrap();
    let target = tmp.path().join("occupied");
    fs::write(&target, "a file, not a directory").unwrap();

    let opts = InstallOptions {
        use_env_shebang: false,
        set_root_runpath: false,
        register_components: true,
        update_search_path: true,
    };
    let err = commands::install(&unpack, &bundle, &PosixIntegration, &target, opts).unwrap_err();
    assert!(err.to_string().contains("exists and is not a directory"));

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "a file, not a directory"
    );
}
