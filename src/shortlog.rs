//! Commit-log capture
//!
//! Invokes the fixed `git shortlog` summary command and captures its text
//! output. The rest of the crate treats that output as an opaque input
//! string; only the roster builder interprets it.

use std::path::Path;
use std::process::Command;

use crate::defaults::GIT_SHORTLOG;
use crate::error::{Error, Result};

/// Run `git shortlog --summary --numbered --email` in `repository` and
/// return its captured stdout.
///
/// This uses the system git command, so any author rewriting configured
/// through `.mailmap` applies before our own alias resolution.
pub fn shortlog_output(repository: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(GIT_SHORTLOG)
        .current_dir(repository)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command_line(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: command_line(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn command_line() -> String {
    format!("git {}", GIT_SHORTLOG.join(" "))
}
