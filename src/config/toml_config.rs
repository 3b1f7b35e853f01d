use crate::utils::error::{BrowscapError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `browscapy.toml`. Every key may be omitted.
///
/// ```toml
/// [source]
/// url = "http://browscap.org/stream?q=BrowsCapCSV"
/// timeout_seconds = 120
///
/// [cache]
/// folder = "${HOME}/.cache/browscapy"
///
/// [search]
/// case_insensitive_fallback = true
///
/// [monitoring]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub case_insensitive_fallback: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

impl FileConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BrowscapError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BrowscapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.source.url {
            validate_url("source.url", url)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        if let Some(folder) = &self.cache.folder {
            validate_path("cache.folder", folder)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
url = "https://mirror.example.com/browscap.csv"
timeout_seconds = 30

[cache]
folder = "/var/cache/browscapy"

[search]
case_insensitive_fallback = false

[monitoring]
enabled = true
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.source.url.as_deref(),
            Some("https://mirror.example.com/browscap.csv")
        );
        assert_eq!(config.source.timeout_seconds, Some(30));
        assert_eq!(config.cache.folder.as_deref(), Some("/var/cache/browscapy"));
        assert_eq!(config.search.case_insensitive_fallback, Some(false));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BROWSCAPY_TEST_CACHE_DIR", "/tmp/browscapy-test");

        let toml_content = r#"
[cache]
folder = "${BROWSCAPY_TEST_CACHE_DIR}/cache"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.cache.folder.as_deref(), Some("/tmp/browscapy-test/cache"));

        std::env::remove_var("BROWSCAPY_TEST_CACHE_DIR");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config =
            FileConfig::from_toml_str("[cache]\nfolder = \"${BROWSCAPY_SURELY_UNSET}\"\n").unwrap();
        assert_eq!(config.cache.folder.as_deref(), Some("${BROWSCAPY_SURELY_UNSET}"));
    }

    #[test]
    fn test_config_validation() {
        let bad_url = FileConfig::from_toml_str("[source]\nurl = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout = FileConfig::from_toml_str("[source]\ntimeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = FileConfig::from_toml_str("[source\nurl = 1").unwrap_err();
        assert!(matches!(err, BrowscapError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[cache]\nfolder = \"/srv/browscapy\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache.folder.as_deref(), Some("/srv/browscapy"));
    }
}
