// src/platform/windows.rs

//! Windows integration: registry hygiene, COM registration, PATH updates.
//!
//! COM objects are registered by running the registration script with the
//! *installed* interpreter so the registry ends up pointing at the new
//! location. PATH changes go to the per-user `Environment` key; a new
//! terminal picks them up.

use super::{IntegrationContext, PlatformIntegration};
use crate::bundle::Bundle;
use crate::error::{Error, Result};
use crate::tool;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_CREATE_SUB_KEY};

/// COM servers shipped with pywin32-carrying bundles.
const COM_MODULES: [(&str, &str); 3] = [
    ("win32com.servers.interp", "Interpreter"),
    ("win32com.servers.dictionary", "DictionaryPolicy"),
    ("win32com.axscript.client.pyscript", "PyScript"),
];

/// Extension module registry entries left behind by older installs.
const STALE_MODULE_KEYS: [&str; 2] = ["pythoncom", "pywintypes"];

pub struct WindowsIntegration;

impl WindowsIntegration {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformIntegration for WindowsIntegration {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn apply(&self, ctx: &IntegrationContext<'_>) -> Result<()> {
        if ctx.bundle.pywin32 {
            remove_stale_module_keys(&ctx.bundle.python_version);

            if ctx.register_components {
                info!("Registering COM modules");
                register_com_modules(ctx.install_dir);
            }

            register_help_file(ctx.install_dir, ctx.bundle);
            ensure_gen_py(ctx.install_dir)?;
        }

        if ctx.update_search_path {
            info!("Adding install directories to the user PATH");
            update_user_path(&path_additions(ctx.install_dir))?;
        }
        Ok(())
    }

    fn extra_qt_conf_dirs(&self, install_dir: &Path) -> Vec<PathBuf> {
        // The interpreter itself lives in the install root on Windows.
        vec![install_dir.to_path_buf()]
    }

    fn qt_note(&self, _install_dir: &Path) -> String {
        "Qt is bundled with this build".to_string()
    }

    fn path_guidance(&self, install_dir: &Path) -> String {
        let entries: Vec<String> = path_additions(install_dir)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        format!("Path={};%Path%", entries.join(";"))
    }

    fn doc_location(&self, install_dir: &Path, bundle: &Bundle) -> PathBuf {
        install_dir.join("Doc").join(format!(
            "python{}.chm",
            bundle.python_version.replace('.', "")
        ))
    }

    fn wants_ssl_guidance(&self) -> bool {
        false
    }
}

/// Directories prepended to the user PATH, in order.
fn path_additions(install_dir: &Path) -> Vec<PathBuf> {
    let mut additions = vec![
        install_dir.to_path_buf(),
        install_dir.join("DLLs"),
        install_dir.join("Scripts"),
        install_dir.join("Tools"),
        install_dir.join("Tools").join("ninja"),
    ];
    let qt_bin = install_dir.join("Qt").join("bin");
    if qt_bin.is_dir() {
        additions.push(qt_bin);
    }
    additions
}

/// Delete `Software\Python\PythonCore\<ver>\Modules\...` keys left by a
/// previous install. Missing keys are the normal case.
fn remove_stale_module_keys(python_version: &str) {
    info!("Removing old extension module registry entries");
    for name in STALE_MODULE_KEYS {
        let key_name =
            format!("Software\\Python\\PythonCore\\{python_version}\\Modules\\{name}");
        for root in [HKEY_LOCAL_MACHINE, HKEY_CURRENT_USER] {
            let hive = RegKey::predef(root);
            let _ = hive.delete_subkey(format!("{key_name}\\Debug"));
            let _ = hive.delete_subkey(&key_name);
        }
    }
}

/// Register the shipped COM servers by invoking the installed interpreter.
/// Per-module failures (typically missing permissions) are warnings.
fn register_com_modules(install_dir: &Path) {
    let python = install_dir.join("python.exe");
    let script = install_dir.join("Scripts").join("register_com.py");
    for (module, class_name) in COM_MODULES {
        let script_arg = script.to_string_lossy();
        let result = tool::run_checked(
            &python,
            &[
                script_arg.as_ref(),
                "--register",
                "--module",
                module,
                "--class",
                class_name,
            ],
        );
        if let Err(e) = result {
            warn!("Could not register COM module {}: {}", module, e);
        }
    }
}

/// Record the help file under the Python root key. HKLM when we may create
/// subkeys there, HKCU otherwise; failure is informational only.
fn register_help_file(install_dir: &Path, bundle: &Bundle) {
    let chm = WindowsIntegration.doc_location(install_dir, bundle);
    let root_key_name = format!("Software\\Python\\PythonCore\\{}", bundle.python_version);

    let hive = match RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey_with_flags(&root_key_name, KEY_CREATE_SUB_KEY)
    {
        Ok(_) => RegKey::predef(HKEY_LOCAL_MACHINE),
        Err(_) => RegKey::predef(HKEY_CURRENT_USER),
    };

    let result = hive
        .create_subkey(format!("{root_key_name}\\Help\\Pythonwin Reference"))
        .and_then(|(key, _)| key.set_value("", &chm.display().to_string()));
    if let Err(e) = result {
        info!("Could not set help file registry key (not serious): {}", e);
    }
}

/// `win32com` generates wrapper code into `gen_py` at runtime; make sure
/// the directory exists up front.
fn ensure_gen_py(install_dir: &Path) -> Result<()> {
    let gen_py = install_dir
        .join("Lib")
        .join("site-packages")
        .join("win32com")
        .join("gen_py");
    if !gen_py.exists() {
        info!("Creating {}", gen_py.display());
        fs::create_dir_all(&gen_py)?;
    }
    Ok(())
}

/// Prepend `new_paths` to the user PATH: read the current value, drop empty
/// entries, dedupe while preserving order, write back.
fn update_user_path(new_paths: &[PathBuf]) -> Result<()> {
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (env, _) = hkcu
        .create_subkey("Environment")
        .map_err(|e| Error::Integration(format!("cannot open Environment key: {e}")))?;
    let current: String = env.get_value("Path").unwrap_or_default();

    let mut merged: Vec<String> = new_paths.iter().map(|p| p.display().to_string()).collect();
    merged.extend(current.split(';').map(str::to_string));

    let mut deduped: Vec<String> = Vec::new();
    for entry in merged {
        if entry.is_empty() {
            continue;
        }
        if !deduped.contains(&entry) {
            deduped.push(entry);
        }
    }

    env.set_value("Path", &deduped.join(";"))
        .map_err(|e| Error::Integration(format!("cannot write Path value: {e}")))?;
    Ok(())
}
