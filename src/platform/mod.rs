//! Platform operations
//!
//! Everything in here shells out to OS tools (`shutdown`, `reg`,
//! `powershell`, `taskkill`) and folds failures into errors carrying
//! both output streams.

pub mod explorer;
pub mod firmware;
pub mod power;
pub mod sysinfo;

use anyhow::{anyhow, Context, Result};
use std::process::{Command, Stdio};

/// Run a program to completion, treating a non-zero exit as an error.
/// Returns captured stdout for callers that parse tool output.
pub(crate) fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to execute {program}"))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    Err(anyhow!(
        "{program} failed: stdout='{}' stderr='{}'",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

/// Spawn a program without waiting on it. Used for hand-off operations
/// (relaunching Explorer) where this process will not be around to see
/// the exit status.
pub(crate) fn spawn_detached(program: &str, args: &[&str]) -> Result<()> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {program}"))?;
    Ok(())
}
