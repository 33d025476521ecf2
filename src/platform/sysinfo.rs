//! System information report.
//!
//! Model and BIOS version come from one PowerShell CIM probe that emits
//! `LABEL:value` lines; the firmware type and Secure Boot state are read
//! by the [`firmware`](super::firmware) module. Every probe is
//! individually best-effort: a failure yields "Unknown", never an error.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::firmware::{self, FirmwareType, SecureBoot};
use super::run;

const UNKNOWN: &str = "Unknown";

// Each probe has its own try/catch so one broken CIM class does not take
// out the rest of the report.
const CIM_PROBE: &str = r#"
try {
    $cs = Get-CimInstance -ClassName Win32_ComputerSystem
    if ($cs) { Write-Output "MODEL:$($cs.Manufacturer) $($cs.Model)" }
} catch { }
try {
    $bios = Get-CimInstance -ClassName Win32_BIOS
    if ($bios) { Write-Output "BIOS_VERSION:$($bios.SMBIOSBIOSVersion)" }
} catch { }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub model: String,
    pub bios_version: String,
    pub firmware: FirmwareType,
    pub secure_boot: SecureBoot,
}

/// Gather the full report. Never fails; missing pieces read "Unknown".
pub fn collect() -> SystemInfo {
    let (model, bios_version) = match run(
        "powershell",
        &["-NoProfile", "-NonInteractive", "-Command", CIM_PROBE],
    ) {
        Ok(out) => parse_probe_output(&out),
        Err(e) => {
            debug!("CIM probe failed: {e:#}");
            (UNKNOWN.to_string(), UNKNOWN.to_string())
        }
    };

    let secure_boot = firmware::secure_boot_state();
    let firmware = firmware::detect(secure_boot, &firmware::system_root());

    SystemInfo { model, bios_version, firmware, secure_boot }
}

/// Parse the labeled lines the probe script emits. Absent or empty labels
/// fall back to "Unknown".
fn parse_probe_output(output: &str) -> (String, String) {
    let mut model = None;
    let mut bios_version = None;

    for line in output.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("MODEL:") {
            if !value.trim().is_empty() {
                model = Some(value.trim().to_string());
            }
        } else if let Some(value) = line.strip_prefix("BIOS_VERSION:") {
            if !value.trim().is_empty() {
                bios_version = Some(value.trim().to_string());
            }
        }
    }

    (
        model.unwrap_or_else(|| UNKNOWN.to_string()),
        bios_version.unwrap_or_else(|| UNKNOWN.to_string()),
    )
}

/// Render the report block shown by `info` and written by `--save`.
pub fn render_report(info: &SystemInfo, version: &str) -> String {
    format!(
        "--- System Information ---\n\
         Model: {}\n\
         BIOS Version: {}\n\
         BIOS Mode: {}\n\
         Secure Boot: {}\n\
         --------------------------\n\
         Version: {}\n",
        info.model, info.bios_version, info.firmware, info.secure_boot, version
    )
}

pub fn save_report(report: &str, path: &Path) -> Result<()> {
    std::fs::write(path, report)
        .with_context(|| format!("Failed to write {}", path.display()))
}
