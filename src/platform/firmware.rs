//! Firmware type and Secure Boot detection.
//!
//! Secure Boot state comes from the registry; the firmware type is derived
//! from it plus a probe for `%SystemRoot%\Firmware`. Both probes are pure
//! functions of their inputs, so repeated calls on one machine agree.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::run;

const SECURE_BOOT_KEY: &str = r"HKLM\SYSTEM\CurrentControlSet\Control\SecureBoot\State";
const SECURE_BOOT_VALUE: &str = "UEFISecureBootEnabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareType {
    Uefi,
    LegacyBios,
}

impl fmt::Display for FirmwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareType::Uefi => write!(f, "UEFI"),
            FirmwareType::LegacyBios => write!(f, "Legacy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecureBoot {
    Enabled,
    Disabled,
    /// The registry key is absent, typically a legacy BIOS machine (or a
    /// host where the query itself is unavailable).
    Unsupported,
}

impl fmt::Display for SecureBoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecureBoot::Enabled => write!(f, "Enabled"),
            SecureBoot::Disabled => write!(f, "Disabled"),
            SecureBoot::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Query the Secure Boot state from the registry. Any failure degrades to
/// `Unsupported` rather than an error: the caller only needs a display
/// value and a UEFI hint.
pub fn secure_boot_state() -> SecureBoot {
    match run("reg", &["query", SECURE_BOOT_KEY, "/v", SECURE_BOOT_VALUE]) {
        Ok(out) => match parse_reg_dword(&out, SECURE_BOOT_VALUE) {
            Some(1) => SecureBoot::Enabled,
            Some(_) => SecureBoot::Disabled,
            None => SecureBoot::Unsupported,
        },
        Err(e) => {
            debug!("Secure Boot query failed: {e:#}");
            SecureBoot::Unsupported
        }
    }
}

/// Detect the firmware type of this machine.
pub fn firmware_type() -> FirmwareType {
    detect(secure_boot_state(), &system_root())
}

/// Secure Boot implies UEFI; otherwise the `Firmware` directory under the
/// system root marks a UEFI install. Anything else is treated as legacy
/// BIOS, which disables direct firmware entry.
pub fn detect(secure_boot: SecureBoot, system_root: &Path) -> FirmwareType {
    if secure_boot == SecureBoot::Enabled {
        return FirmwareType::Uefi;
    }
    if system_root.join("Firmware").exists() {
        return FirmwareType::Uefi;
    }
    FirmwareType::LegacyBios
}

pub(crate) fn system_root() -> PathBuf {
    std::env::var_os("SystemRoot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"))
}

/// Parse a REG_DWORD value out of `reg query` output. Value lines look
/// like `    UEFISecureBootEnabled    REG_DWORD    0x1`.
fn parse_reg_dword(output: &str, value_name: &str) -> Option<u32> {
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some(value_name) {
            continue;
        }
        if fields.next() != Some("REG_DWORD") {
            continue;
        }
        let raw = fields.next()?;
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        return u32::from_str_radix(raw, 16).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const REG_OUTPUT: &str = "\r\n\
HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\SecureBoot\\State\r\n\
    UEFISecureBootEnabled    REG_DWORD    0x1\r\n\
\r\n";

    #[test]
    fn parses_enabled_dword() {
        assert_eq!(parse_reg_dword(REG_OUTPUT, "UEFISecureBootEnabled"), Some(1));
    }

    #[test]
    fn parses_disabled_dword() {
        let out = REG_OUTPUT.replace("0x1", "0x0");
        assert_eq!(parse_reg_dword(&out, "UEFISecureBootEnabled"), Some(0));
    }

    #[test]
    fn missing_value_is_none() {
        assert_eq!(parse_reg_dword(REG_OUTPUT, "SomeOtherValue"), None);
        assert_eq!(parse_reg_dword("", "UEFISecureBootEnabled"), None);
    }

    #[test]
    fn secure_boot_enabled_means_uefi() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(detect(SecureBoot::Enabled, temp.path()), FirmwareType::Uefi);
    }

    #[test]
    fn firmware_directory_means_uefi() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Firmware")).unwrap();
        assert_eq!(detect(SecureBoot::Disabled, temp.path()), FirmwareType::Uefi);
        assert_eq!(detect(SecureBoot::Unsupported, temp.path()), FirmwareType::Uefi);
    }

    #[test]
    fn no_markers_means_legacy() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(detect(SecureBoot::Disabled, temp.path()), FirmwareType::LegacyBios);
        assert_eq!(detect(SecureBoot::Unsupported, temp.path()), FirmwareType::LegacyBios);
    }

    #[test]
    fn detection_is_stable_across_calls() {
        let temp = tempfile::tempdir().unwrap();
        let first = detect(SecureBoot::Disabled, temp.path());
        for _ in 0..3 {
            assert_eq!(detect(SecureBoot::Disabled, temp.path()), first);
        }
    }
}
