//! Language preference store.
//!
//! A single `key=value` line in `config.txt` under the per-user data
//! directory. A missing or unreadable file means the default; saving
//! rewrites the whole file.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    /// The value stored in the config file.
    pub fn config_value(self) -> &'static str {
        match self {
            Language::English => "En",
            Language::Arabic => "Ar",
        }
    }

    /// Accepts the stored form and common CLI spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" => Some(Language::Arabic),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_value())
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `%APPDATA%\BootEase`, with a dotfile fallback for non-Windows
    /// hosts so the store still works everywhere the binary runs.
    pub fn new_default() -> Self {
        let base = std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("BootEase"))
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Load the stored language. Tolerant: missing file, unreadable file
    /// or unrecognized content all fall back to the default.
    pub fn load_language(&self) -> Language {
        let path = self.config_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => parse_config(&content),
            Err(e) => {
                debug!("No readable config at {} ({e}), using default", path.display());
                Language::default()
            }
        }
    }

    pub fn save_language(&self, language: Language) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.config_path();
        std::fs::write(&path, format!("Language={}\n", language.config_value()))
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn parse_config(content: &str) -> Language {
    for line in content.lines() {
        if let Some(value) = line.trim().strip_prefix("Language=") {
            if let Some(language) = Language::parse(value) {
                return language;
            }
        }
    }
    Language::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_language() {
        let temp = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(temp.path().join("BootEase"));

        store.save_language(Language::Arabic).unwrap();
        assert_eq!(store.load_language(), Language::Arabic);

        store.save_language(Language::English).unwrap();
        assert_eq!(store.load_language(), Language::English);
    }

    #[test]
    fn missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(temp.path().join("nowhere"));
        assert_eq!(store.load_language(), Language::English);
    }

    #[test]
    fn garbage_content_is_default() {
        assert_eq!(parse_config("Theme=Dark\nnoise"), Language::English);
        assert_eq!(parse_config("Language=Klingon"), Language::English);
        assert_eq!(parse_config(""), Language::English);
    }

    #[test]
    fn stored_form_parses() {
        assert_eq!(parse_config("Language=Ar\n"), Language::Arabic);
        assert_eq!(parse_config("Language=En\n"), Language::English);
    }

    #[test]
    fn cli_spellings_parse() {
        assert_eq!(Language::parse("EN"), Some(Language::English));
        assert_eq!(Language::parse("arabic"), Some(Language::Arabic));
        assert_eq!(Language::parse("fr"), None);
    }
}
