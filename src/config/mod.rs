#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_SOURCE_URL;
use crate::adapters::storage::LocalStorage;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::{FileConfig, MAX_TIMEOUT_SECONDS};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

pub const DEFAULT_CACHE_FOLDER: &str = "~/.browscapy";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Path of a TOML file read by `search-stdin`.
pub const CONFIG_ENV: &str = "BROWSCAPY_CONFIG";
/// Cache folder override for `search-stdin`.
pub const CACHE_ENV: &str = "BROWSCAPY_CACHE";

/// Resolved settings: built-in defaults, overlaid by a config file, overlaid
/// by command line flags or environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source_url: String,
    pub cache_folder: String,
    pub timeout_seconds: u64,
    pub case_insensitive_fallback: bool,
    pub monitor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_folder: DEFAULT_CACHE_FOLDER.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            case_insensitive_fallback: true,
            monitor: false,
        }
    }
}

impl Settings {
    pub fn from_file_config(file: &FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            source_url: file.source.url.clone().unwrap_or(defaults.source_url),
            cache_folder: file.cache.folder.clone().unwrap_or(defaults.cache_folder),
            timeout_seconds: file.source.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            case_insensitive_fallback: file
                .search
                .case_insensitive_fallback
                .unwrap_or(defaults.case_insensitive_fallback),
            monitor: file.monitoring_enabled(),
        }
    }

    /// Settings for the flag-less harness, taken from `BROWSCAPY_CONFIG` and
    /// `BROWSCAPY_CACHE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_ENV) {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = FileConfig::from_file(&path)?;
                file.validate()?;
                Self::from_file_config(&file)
            }
            None => Self::default(),
        };
        if let Some(folder) = lookup(CACHE_ENV) {
            settings.cache_folder = folder;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Local storage rooted at the configured cache folder, `~` expanded.
    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(expand_home(self.cache_folder()))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("source_url", &self.source_url)?;
        validate_path("cache_folder", &self.cache_folder)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn cache_folder(&self) -> &str {
        &self.cache_folder
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn case_insensitive_fallback(&self) -> bool {
        self.case_insensitive_fallback
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

/// Expands a leading `~` to the user's home folder.
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (path, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (p, Some(home)) if p.starts_with("~/") => PathBuf::from(home).join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
