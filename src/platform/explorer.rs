//! Restart Windows Explorer without rebooting.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use super::spawn_detached;

/// Kill every `explorer.exe` instance, then start a fresh one from the
/// Windows directory. "Nothing to kill" is not an error: Explorer may
/// already be down, which is usually why the user is running this.
pub fn restart_explorer() -> Result<()> {
    info!("Restarting Explorer");
    kill_explorer()?;

    let exe = windows_dir().join("explorer.exe");
    spawn_detached(&exe.display().to_string(), &[]).context("Failed to relaunch Explorer")
}

fn kill_explorer() -> Result<()> {
    let output = Command::new("taskkill")
        .args(["/F", "/IM", "explorer.exe"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to execute taskkill")?;

    if output.status.success() {
        return Ok(());
    }

    // Exit code 128 means no matching process; stderr text is localized
    // and cannot be matched reliably.
    if no_process_matched(output.status.code()) {
        debug!("No running Explorer instance to kill");
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(anyhow!("taskkill failed: {}", stderr.trim()))
}

fn no_process_matched(exit_code: Option<i32>) -> bool {
    exit_code == Some(128)
}

fn windows_dir() -> PathBuf {
    std::env::var_os("WINDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"))
}
