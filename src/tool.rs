// src/tool.rs

//! Blocking external tool invocation.
//!
//! Every subprocess the installer spawns goes through here: stdin is
//! nullified so a misbehaving tool can never hang on input, and a timeout
//! bounds the wait. Advisory queries return `None` on any failure; required
//! invocations surface `Error::ToolFailed`.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Default timeout for external tool invocations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Run a tool and capture stdout. Best-effort: a missing binary, a timeout,
/// or a non-zero exit all yield `None`.
pub fn capture_stdout(program: impl AsRef<OsStr>, args: &[&str]) -> Option<String> {
    let name = program.as_ref().to_string_lossy().into_owned();
    let mut child = match Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            debug!("Could not spawn {}: {}", name, e);
            return None;
        }
    };

    match child.wait_timeout(DEFAULT_TIMEOUT) {
        Ok(Some(status)) if status.success() => {
            let mut out = String::new();
            child.stdout.take()?.read_to_string(&mut out).ok()?;
            Some(out)
        }
        Ok(Some(status)) => {
            debug!("{} exited with {}", name, status);
            None
        }
        Ok(None) => {
            warn!("{} timed out, killing it", name);
            let _ = child.kill();
            let _ = child.wait();
            None
        }
        Err(e) => {
            debug!("Failed waiting on {}: {}", name, e);
            None
        }
    }
}

/// Run a tool that must succeed. Non-zero exit and timeout both fail.
pub fn run_checked(program: impl AsRef<OsStr>, args: &[&str]) -> Result<()> {
    let name = program.as_ref().to_string_lossy().into_owned();
    let mut child = Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| Error::ToolFailed {
            tool: name.clone(),
            detail: e.to_string(),
        })?;

    match child.wait_timeout(DEFAULT_TIMEOUT) {
        Ok(Some(status)) if status.success() => Ok(()),
        Ok(Some(status)) => Err(Error::ToolFailed {
            tool: name.clone(),
            detail: format!("exited with {status}"),
        }),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(Error::ToolFailed {
                tool: name.clone(),
                detail: format!("timed out after {}s", DEFAULT_TIMEOUT.as_secs()),
            })
        }
        Err(e) => Err(Error::ToolFailed {
            tool: name.clone(),
            detail: e.to_string(),
        }),
    }
}
