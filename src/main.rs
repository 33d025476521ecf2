//! BootEase
//!
//! Reboots straight into BIOS/UEFI firmware setup or the Windows recovery
//! menu, restarts Explorer, reports firmware information, and installs or
//! removes itself.

mod config;
mod platform;
mod setup;
mod update;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use config::{Language, SettingsStore};
use platform::firmware::{self, FirmwareType};
use platform::power::{self, RebootTarget};
use platform::{explorer, sysinfo};

#[derive(Parser)]
#[command(name = "bootease", version = update::CURRENT_VERSION)]
#[command(about = "Reboot into BIOS/UEFI setup or the Windows recovery menu", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reboot straight into BIOS/UEFI firmware setup (UEFI machines only)
    Bios,
    /// Reboot into the Windows recovery menu
    Recovery,
    /// Reboot into the recovery menu to reach Safe Mode
    Safe,
    /// Perform a plain restart
    Restart,
    /// Restart Windows Explorer without rebooting
    Explorer,
    /// Print system and firmware information
    Info {
        /// Also write the report to a text file
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
    /// Check the release feed for a newer version
    CheckUpdate,
    /// Show or set the stored language preference
    Lang {
        /// New preference ("en" or "ar"); omit to show the current one
        language: Option<String>,
    },
    /// Copy this executable into the per-machine install directory
    Install,
    /// Remove the installed copy
    Uninstall,
}

fn main() {
    // Initialize logging to stdout/stderr
    tracing_subscriber::fmt::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    let args = rewrite_legacy_args(std::env::args().collect());
    let cli = Cli::parse_from(args);

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// The GUI releases accepted `/bios`, `-bios`, `--bios` style switches and
/// acted on them immediately. Map those spellings onto the matching
/// subcommand so existing shortcuts keep working.
fn rewrite_legacy_args(mut args: Vec<String>) -> Vec<String> {
    for arg in args.iter_mut().skip(1) {
        let lower = arg.to_ascii_lowercase();
        if !lower.starts_with('/') && !lower.starts_with('-') {
            continue;
        }
        match lower.trim_start_matches(['/', '-']) {
            name @ ("bios" | "recovery" | "safe") => *arg = name.to_string(),
            _ => {}
        }
    }
    args
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Bios) => {
            // Direct firmware entry only exists on UEFI; shutdown /fw on a
            // legacy BIOS machine fails with an opaque error, so check first.
            if firmware::firmware_type() == FirmwareType::LegacyBios {
                return Err(anyhow!(
                    "this machine boots in legacy BIOS mode; direct firmware entry needs UEFI"
                ));
            }
            power::reboot(RebootTarget::Firmware)
        }
        Some(Commands::Recovery) | Some(Commands::Safe) => power::reboot(RebootTarget::Recovery),
        Some(Commands::Restart) => power::reboot(RebootTarget::Restart),
        Some(Commands::Explorer) => explorer::restart_explorer(),
        Some(Commands::Info { save }) => {
            let info = sysinfo::collect();
            let report = sysinfo::render_report(&info, update::CURRENT_VERSION);
            print!("{report}");
            if let Some(path) = save {
                sysinfo::save_report(&report, &path)?;
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        Some(Commands::CheckUpdate) => {
            info!("Checking {} for a newer release", update::RELEASE_URL);
            match update::check(update::RELEASE_URL, update::CURRENT_VERSION)? {
                update::UpdateStatus::Available { latest } => {
                    println!(
                        "New update available: {latest} (current {})",
                        update::CURRENT_VERSION
                    );
                }
                update::UpdateStatus::UpToDate => {
                    println!("You are using the latest version ({}).", update::CURRENT_VERSION);
                }
            }
            Ok(())
        }
        Some(Commands::Lang { language }) => {
            let store = SettingsStore::new_default();
            match language {
                Some(value) => {
                    let language = Language::parse(&value).ok_or_else(|| {
                        anyhow!("unknown language {value:?} (expected 'en' or 'ar')")
                    })?;
                    store.save_language(language)?;
                    println!("Language preference set to {language}");
                }
                None => println!("Language preference: {}", store.load_language()),
            }
            Ok(())
        }
        Some(Commands::Install) => {
            let plan = setup::InstallPlan::new_default();
            setup::install_self(&plan)?;
            println!("Installed to {}", plan.install_dir.display());
            Ok(())
        }
        Some(Commands::Uninstall) => {
            let plan = setup::InstallPlan::new_default();
            setup::uninstall(&plan)?;
            println!("Uninstall complete");
            Ok(())
        }
        None => {
            // No subcommand: show what the machine looks like plus a short
            // usage block, then exit.
            let info = sysinfo::collect();
            print!("{}", sysinfo::render_report(&info, update::CURRENT_VERSION));
            println!();
            println!("Usage:");
            println!("  bootease bios          Reboot into BIOS/UEFI setup");
            println!("  bootease recovery      Reboot into the recovery menu");
            println!("  bootease restart       Plain restart");
            println!("  bootease explorer      Restart Windows Explorer");
            println!("  bootease info          Show system information");
            println!("  bootease check-update  Check for a newer release");
            println!("  bootease install       Install to Program Files");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(args: &[&str]) -> Vec<String> {
        rewrite_legacy_args(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn legacy_switches_become_subcommands() {
        assert_eq!(rewrite(&["bootease", "/bios"]), vec!["bootease", "bios"]);
        assert_eq!(rewrite(&["bootease", "-recovery"]), vec!["bootease", "recovery"]);
        assert_eq!(rewrite(&["bootease", "--safe"]), vec!["bootease", "safe"]);
        assert_eq!(rewrite(&["bootease", "/BIOS"]), vec!["bootease", "bios"]);
    }

    #[test]
    fn other_args_pass_through() {
        assert_eq!(
            rewrite(&["bootease", "info", "--save", "out.txt"]),
            vec!["bootease", "info", "--save", "out.txt"]
        );
        assert_eq!(rewrite(&["bootease", "--version"]), vec!["bootease", "--version"]);
        assert_eq!(rewrite(&["bootease"]), vec!["bootease"]);
    }

    #[test]
    fn program_name_is_never_rewritten() {
        assert_eq!(rewrite(&["/bios"]), vec!["/bios"]);
    }
}
