// src/materialize.rs

//! Payload tree materialization.
//!
//! Copies the prepared payload tree to the chosen install directory in one
//! blocking pass: directories are created (existing ones tolerated, so
//! installing over a previous install behaves like `dirs_exist_ok`),
//! symlinks are recreated with their original targets, and regular files
//! are copied with permissions preserved. There is no rollback; an I/O
//! error aborts the run and may leave the destination partially populated.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Counts of what one materialization pass created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeStats {
    pub dirs: usize,
    pub files: usize,
    pub symlinks: usize,
}

/// Reject targets that exist but are not directories. Existence itself is
/// allowed; the interactive flow separately confirms installing over an
/// existing directory.
pub fn validate_install_dir(target: &Path) -> Result<()> {
    if target.exists() && !target.is_dir() {
        return Err(Error::TargetNotDirectory(target.to_path_buf()));
    }
    Ok(())
}

/// Copy `payload` to `target`, preserving symlink structure.
pub fn materialize_tree(payload: &Path, target: &Path) -> Result<MaterializeStats> {
    if !payload.is_dir() {
        return Err(Error::PayloadMissing(payload.to_path_buf()));
    }
    validate_install_dir(target)?;

    let mut stats = MaterializeStats::default();
    for entry in WalkDir::new(payload).follow_links(false) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let Ok(rel) = entry.path().strip_prefix(payload) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            // The payload root itself maps onto the target.
            fs::create_dir_all(target)?;
            continue;
        }
        let dest = target.join(rel);

        if entry.path_is_symlink() {
            let link_target = fs::read_link(entry.path())?;
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            // Replace whatever a previous install left behind. A real
            // directory in the way surfaces as the symlink creation error.
            if let Ok(meta) = dest.symlink_metadata() {
                if meta.file_type().is_symlink() || meta.is_file() {
                    fs::remove_file(&dest)?;
                }
            }
            make_symlink(&link_target, &dest)?;
            debug!("Linked {} -> {}", dest.display(), link_target.display());
            stats.symlinks += 1;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
            stats.dirs += 1;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            debug!("Copied {}", dest.display());
            stats.files += 1;
        }
    }

    info!(
        "Materialized {} files, {} directories, {} symlinks into {}",
        stats.files,
        stats.dirs,
        stats.symlinks,
        target.display()
    );
    Ok(stats)
}

#[cfg(unix)]
fn make_symlink(link_target: &Path, dest: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link_target, dest)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_symlink(_link_target: &Path, dest: &Path) -> Result<()> {
    Err(Error::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("cannot recreate symlink at {}", dest.display()),
    )))
}
