//! Install and uninstall.
//!
//! Install copies the running executable into a fixed per-machine
//! directory. Uninstall stops any running installed copy (best effort,
//! bounded wait) and removes the directory, tolerating in-use files by
//! falling back to deleting the executable alone. No transactionality:
//! a partial failure leaves whatever it leaves.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const EXE_NAME: &str = "bootease.exe";

/// How long to let the OS release file handles after killing a running
/// installed copy.
const KILL_SETTLE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub install_dir: PathBuf,
    pub exe_path: PathBuf,
}

impl InstallPlan {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        let install_dir = install_dir.into();
        let exe_path = install_dir.join(EXE_NAME);
        Self { install_dir, exe_path }
    }

    /// `%ProgramFiles%\BootEase`.
    pub fn new_default() -> Self {
        let base = std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"));
        Self::new(base.join("BootEase"))
    }

    pub fn is_installed(&self) -> bool {
        self.exe_path.exists()
    }
}

/// Copy `source_exe` into the install directory.
pub fn install(plan: &InstallPlan, source_exe: &Path) -> Result<()> {
    info!("Installing to {}", plan.install_dir.display());

    std::fs::create_dir_all(&plan.install_dir)
        .with_context(|| format!("Failed to create {}", plan.install_dir.display()))?;

    std::fs::copy(source_exe, &plan.exe_path).with_context(|| {
        format!("Failed to copy {} to {}", source_exe.display(), plan.exe_path.display())
    })?;

    Ok(())
}

/// Install the currently running executable.
pub fn install_self(plan: &InstallPlan) -> Result<()> {
    let source = std::env::current_exe().context("Failed to resolve own executable path")?;
    install(plan, &source)
}

/// Remove the install directory. Idempotent: an already-clean prefix is a
/// no-op.
pub fn uninstall(plan: &InstallPlan) -> Result<()> {
    kill_installed();

    if !plan.install_dir.exists() {
        info!("Nothing to uninstall at {}", plan.install_dir.display());
        return Ok(());
    }

    match std::fs::remove_dir_all(&plan.install_dir) {
        Ok(()) => {
            info!("Removed {}", plan.install_dir.display());
            Ok(())
        }
        Err(e) => {
            // Usually a file still in use. Take out the executable alone
            // so the tool at least stops being runnable.
            warn!("Recursive delete failed ({e}), removing the executable alone");
            if plan.exe_path.exists() {
                std::fs::remove_file(&plan.exe_path)
                    .with_context(|| format!("Failed to remove {}", plan.exe_path.display()))?;
            }
            Ok(())
        }
    }
}

/// Best effort: stop a running installed copy before deleting its files.
/// Failure here never blocks the uninstall.
fn kill_installed() {
    let output = Command::new("taskkill")
        .args(taskkill_args(std::process::id()))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(out) if out.status.success() => {
            std::thread::sleep(KILL_SETTLE);
        }
        Ok(_) => debug!("No running copy of {EXE_NAME} to stop"),
        Err(e) => debug!("taskkill unavailable: {e}"),
    }
}

/// Filter arguments for taskkill. The uninstaller itself runs under the
/// installed image name, so killing by `/IM` alone would take out the
/// calling process too; the PID filter keeps the caller alive.
fn taskkill_args(own_pid: u32) -> Vec<String> {
    vec![
        "/F".to_string(),
        "/FI".to_string(),
        format!("IMAGENAME eq {EXE_NAME}"),
        "/FI".to_string(),
        format!("PID ne {own_pid}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_exe(dir: &Path) -> PathBuf {
        let source = dir.join("source.exe");
        fs::write(&source, b"payload").unwrap();
        source
    }

    #[test]
    fn plan_paths_join_exe_name() {
        let plan = InstallPlan::new("/opt/bootease");
        assert_eq!(plan.exe_path, PathBuf::from("/opt/bootease").join(EXE_NAME));
    }

    #[test]
    fn install_copies_executable() {
        let temp = tempfile::tempdir().unwrap();
        let source = fake_exe(temp.path());
        let plan = InstallPlan::new(temp.path().join("BootEase"));

        assert!(!plan.is_installed());
        install(&plan, &source).unwrap();
        assert!(plan.is_installed());
        assert_eq!(fs::read(&plan.exe_path).unwrap(), b"payload");
    }

    #[test]
    fn reinstall_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let source = fake_exe(temp.path());
        let plan = InstallPlan::new(temp.path().join("BootEase"));

        install(&plan, &source).unwrap();
        fs::write(temp.path().join("source.exe"), b"newer payload").unwrap();
        install(&plan, &source).unwrap();
        assert_eq!(fs::read(&plan.exe_path).unwrap(), b"newer payload");
    }

    #[test]
    fn uninstall_removes_install_dir() {
        let temp = tempfile::tempdir().unwrap();
        let source = fake_exe(temp.path());
        let plan = InstallPlan::new(temp.path().join("BootEase"));

        install(&plan, &source).unwrap();
        uninstall(&plan).unwrap();
        assert!(!plan.install_dir.exists());
        assert!(!plan.is_installed());
    }

    #[test]
    fn uninstall_on_clean_prefix_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        let plan = InstallPlan::new(temp.path().join("BootEase"));

        uninstall(&plan).unwrap();
        uninstall(&plan).unwrap();
        assert!(!plan.install_dir.exists());
    }

    #[test]
    fn taskkill_filter_spares_the_calling_process() {
        let args = taskkill_args(4242);
        assert_eq!(args[0], "/F");
        assert!(args.contains(&format!("IMAGENAME eq {EXE_NAME}")));
        assert!(args.contains(&"PID ne 4242".to_string()));
        // No bare /IM: that form would match every bootease.exe,
        // including the uninstaller itself.
        assert!(!args.iter().any(|a| a == "/IM"));
    }

    #[test]
    fn uninstall_twice_after_install_is_ok() {
        let temp = tempfile::tempdir().unwrap();
        let source = fake_exe(temp.path());
        let plan = InstallPlan::new(temp.path().join("BootEase"));

        install(&plan, &source).unwrap();
        uninstall(&plan).unwrap();
        uninstall(&plan).unwrap();
    }
}
