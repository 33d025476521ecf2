//! Reboot actions
//!
//! Each action maps to a fixed `shutdown` argument vector and is handed
//! off to the OS. There is no retry: once `shutdown` accepts the request
//! the machine is going down and nothing is left to clean up.

use anyhow::{Context, Result};
use tracing::info;

use super::run;

/// Where the machine should end up after the reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootTarget {
    /// Straight into BIOS/UEFI firmware setup. UEFI machines only.
    Firmware,
    /// The Windows recovery menu (advanced startup). Safe Mode is reached
    /// from there; setting `safeboot` via bcdedit is deliberately avoided
    /// because it sticks until somebody clears it.
    Recovery,
    /// Plain restart.
    Restart,
}

impl RebootTarget {
    /// The `shutdown` arguments for this action.
    pub fn shutdown_args(self) -> &'static [&'static str] {
        match self {
            RebootTarget::Firmware => &["/r", "/fw", "/t", "0"],
            RebootTarget::Recovery => &["/r", "/o", "/t", "0"],
            RebootTarget::Restart => &["/r", "/t", "0"],
        }
    }
}

/// Ask the OS to reboot into the given target.
pub fn reboot(target: RebootTarget) -> Result<()> {
    info!("Requesting reboot: {:?}", target);
    run("shutdown", target.shutdown_args())
        .map(|_| ())
        .with_context(|| format!("Reboot request failed for {target:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firmware_args_include_fw_flag() {
        assert_eq!(RebootTarget::Firmware.shutdown_args(), &["/r", "/fw", "/t", "0"]);
    }

    #[test]
    fn recovery_args_use_advanced_startup() {
        assert_eq!(RebootTarget::Recovery.shutdown_args(), &["/r", "/o", "/t", "0"]);
    }

    #[test]
    fn restart_args_are_immediate() {
        assert_eq!(RebootTarget::Restart.shutdown_args(), &["/r", "/t", "0"]);
    }

    #[test]
    fn every_target_restarts_with_no_delay() {
        for target in [RebootTarget::Firmware, RebootTarget::Recovery, RebootTarget::Restart] {
            let args = target.shutdown_args();
            assert_eq!(args[0], "/r");
            assert_eq!(&args[args.len() - 2..], &["/t", "0"]);
        }
    }
}
