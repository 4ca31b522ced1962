// src/qt.rs

//! Qt configuration for bundles that ship a `Qt/` tree.
//!
//! Qt resolves its plugin and library paths through `qt.conf` files sitting
//! next to executables. When the bundle carries Qt, one is written into
//! `Qt/bin` and into whatever extra locations the platform adapter names,
//! each pointing `Prefix` at the relocated Qt tree.

use crate::error::Result;
use crate::platform::PlatformIntegration;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write the `qt.conf` files for a bundled Qt tree, if any. Returns the
/// platform's Qt note for the final report, or `None` when the bundle has
/// no `Qt/` directory.
pub fn configure(install_dir: &Path, platform: &dyn PlatformIntegration) -> Result<Option<String>> {
    let qt_dir = install_dir.join("Qt");
    if !qt_dir.exists() {
        return Ok(None);
    }

    write_qt_conf(&qt_dir.join("bin"), &qt_dir)?;
    for dir in platform.extra_qt_conf_dirs(install_dir) {
        write_qt_conf(&dir, &qt_dir)?;
    }
    Ok(Some(platform.qt_note(install_dir)))
}

fn write_qt_conf(dir: &Path, qt_prefix: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let conf = dir.join("qt.conf");
    // Backslashes must be doubled in qt.conf values.
    let prefix = qt_prefix.display().to_string().replace('\\', "\\\\");
    fs::write(&conf, format!("[Paths]\nPrefix = {prefix}"))?;
    debug!("Wrote {}", conf.display());
    Ok(())
}
