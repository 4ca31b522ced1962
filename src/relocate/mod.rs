// src/relocate/mod.rs

//! Path relocation.
//!
//! Payload files carry a build-time placeholder path wherever the final
//! install location had to be baked in. After materialization, every file
//! listed in the relocation manifest is rewritten in place so the
//! placeholder becomes the real install directory.
//!
//! Two substitution modes, chosen per file by content:
//!
//! - **Text** (no NUL byte): every occurrence is replaced free-width; the
//!   file may grow or shrink.
//! - **Binary** (NUL byte present): the replacement is NUL-padded to the
//!   placeholder's exact byte length so embedded string tables and offsets
//!   survive. An install path longer than the placeholder cannot be
//!   substituted safely and aborts the run as a configuration error.
//!
//! A file without any occurrence is a no-op (already relocated, or a stale
//! manifest entry), which makes the whole pass idempotent. Manifest entries
//! naming files that do not exist are skipped without failing the run.

mod manifest;

pub use manifest::{read_manifest, sanitize_entry};

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// What `relocate_file` did to one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileChange {
    /// Placeholder occurrences replaced.
    pub replaced: usize,
    /// Whether the shebang line was rewritten to `/usr/bin/env`.
    pub shebang: bool,
}

impl FileChange {
    fn touched(self) -> bool {
        self.replaced > 0 || self.shebang
    }
}

/// Totals for one manifest pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    /// Files rewritten (placeholder and/or shebang).
    pub rewritten: usize,
    /// Manifest entries whose file was not on disk.
    pub missing: usize,
    /// Files read but left untouched.
    pub untouched: usize,
    /// Shebang lines rewritten.
    pub shebangs: usize,
}

/// Rewrites placeholder paths under one install directory.
pub struct Relocator<'a> {
    install_dir: &'a Path,
    placeholder: &'a str,
    use_env_shebang: bool,
}

impl<'a> Relocator<'a> {
    pub fn new(install_dir: &'a Path, placeholder: &'a str) -> Self {
        Self {
            install_dir,
            placeholder,
            use_env_shebang: false,
        }
    }

    /// Also rewrite `#!<install-dir>/...` shebang lines to
    /// `#!/usr/bin/env <interpreter>`.
    pub fn with_env_shebang(mut self, use_env_shebang: bool) -> Self {
        self.use_env_shebang = use_env_shebang;
        self
    }

    /// Process every entry of the manifest at `manifest_path`. A missing
    /// manifest means the bundle has nothing to relocate.
    pub fn run(&self, manifest_path: &Path) -> Result<RelocationSummary> {
        let mut summary = RelocationSummary::default();

        if !manifest_path.exists() {
            debug!(
                "No relocation manifest at {}, nothing to relocate",
                manifest_path.display()
            );
            return Ok(summary);
        }

        for entry in read_manifest(manifest_path)? {
            let target = self.install_dir.join(&entry);
            if !target.exists() {
                debug!("Manifest entry {} not present, skipping", entry.display());
                summary.missing += 1;
                continue;
            }
            let change = self.relocate_file(&target)?;
            if change.touched() {
                debug!(
                    "Relocated {} ({} occurrence(s))",
                    target.display(),
                    change.replaced
                );
                summary.rewritten += 1;
            } else {
                summary.untouched += 1;
            }
            if change.shebang {
                summary.shebangs += 1;
            }
        }

        info!(
            "Relocation: {} rewritten, {} untouched, {} missing, {} shebangs",
            summary.rewritten, summary.untouched, summary.missing, summary.shebangs
        );
        Ok(summary)
    }

    /// Rewrite one file in place. Reads the whole file, substitutes, and
    /// writes back only when something changed.
    pub fn relocate_file(&self, file: &Path) -> Result<FileChange> {
        let original = fs::read(file)?;
        let placeholder = self.placeholder.as_bytes();
        let real = self.install_dir.as_os_str().as_encoded_bytes();

        let occurrences = count_occurrences(&original, placeholder);
        let binary = original.contains(&0);

        if occurrences > 0 && binary && real.len() > placeholder.len() {
            return Err(Error::PlaceholderOverflow {
                file: file.to_path_buf(),
                path_len: real.len(),
                reserved: placeholder.len(),
            });
        }

        let mut change = FileChange::default();
        let mut content = if occurrences == 0 {
            original
        } else if binary {
            change.replaced = occurrences;
            replace_all(&original, placeholder, &pad_to_width(real, placeholder.len()))
        } else {
            change.replaced = occurrences;
            replace_all(&original, placeholder, real)
        };

        if self.use_env_shebang && !binary {
            if let Some(rewritten) = rewrite_env_shebang(&content, real) {
                content = rewritten;
                change.shebang = true;
            }
        }

        if change.touched() {
            fs::write(file, &content)?;
        }
        Ok(change)
    }
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

/// Replace every occurrence of `needle`. `replacement` need not match the
/// needle's length; fixed-width callers pad it beforehand.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack.len() - i >= needle.len() && &haystack[i..i + needle.len()] == needle {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

/// NUL-pad `bytes` to exactly `width`. Callers guarantee `bytes` fits.
fn pad_to_width(bytes: &[u8], width: usize) -> Vec<u8> {
    debug_assert!(bytes.len() <= width);
    let mut padded = bytes.to_vec();
    padded.resize(width, 0);
    padded
}

/// Rewrite a `#!<install-dir>/.../<interpreter>` first line to
/// `#!/usr/bin/env <interpreter>`, preserving any interpreter arguments.
/// Returns `None` when the file has no such shebang.
fn rewrite_env_shebang(content: &[u8], install_dir: &[u8]) -> Option<Vec<u8>> {
    let rest = content.strip_prefix(b"#!")?;
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let line = std::str::from_utf8(&rest[..line_end]).ok()?;

    let trimmed = line.trim_start();
    let (interpreter, args) = match trimmed.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (trimmed, ""),
    };

    let prefix = std::str::from_utf8(install_dir).ok()?;
    if !interpreter.starts_with(prefix) {
        return None;
    }
    let basename = interpreter.rsplit('/').next()?;

    let mut new_line = format!("#!/usr/bin/env {basename}");
    if !args.is_empty() {
        new_line.push(' ');
        new_line.push_str(args);
    }

    let mut out = new_line.into_bytes();
    out.extend_from_slice(&rest[line_end..]);
    Some(out)
}
