use crate::config::toml_config::FileConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "browscapy")]
#[command(about = "Fast and low-memory user-agent lookups for browscap.org data")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Cache folder holding browscap.csv and the converted cache
    #[arg(long)]
    pub cache: Option<String>,

    /// URL browscap.csv is downloaded from
    #[arg(long)]
    pub url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download browscap.csv when the remote copy is newer
    Fetch {
        /// Download even if the local file looks up to date
        #[arg(long)]
        force: bool,
    },
    /// Build the pattern cache from browscap.csv
    Convert,
    /// Look up user agents and print the results as JSON
    Search {
        #[arg(required = true)]
        user_agents: Vec<String>,
    },
    /// Time lookups of user agents read from stdin, one per line
    Bench {
        /// Log CPU and memory usage
        #[arg(long)]
        monitor: bool,
    },
    /// Show statistics about the converted cache
    Stats,
}

impl CliConfig {
    /// Merges the configuration file (if any) with command line flags.
    pub fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        let mut settings = Settings::from_file_config(&file);
        if let Some(cache) = &self.cache {
            settings.cache_folder = cache.clone();
        }
        if let Some(url) = &self.url {
            settings.source_url = url.clone();
        }
        if let Command::Bench { monitor: true } = self.command {
            settings.monitor = true;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_command() {
        let config = CliConfig::try_parse_from(["browscapy", "fetch"]).unwrap();
        assert_eq!(config.command, Command::Fetch { force: false });

        let forced = CliConfig::try_parse_from(["browscapy", "fetch", "--force"]).unwrap();
        assert_eq!(forced.command, Command::Fetch { force: true });
    }

    #[test]
    fn test_convert_command() {
        let config = CliConfig::try_parse_from(["browscapy", "--cache", "/tmp/bc", "convert"]).unwrap();
        assert_eq!(config.command, Command::Convert);
        assert_eq!(config.settings().unwrap().cache_folder, "/tmp/bc");
    }

    #[test]
    fn test_search_requires_user_agent() {
        assert!(CliConfig::try_parse_from(["browscapy", "search"]).is_err());

        let config = CliConfig::try_parse_from(["browscapy", "search", "curl/7.0", "Wget/1.0"]).unwrap();
        assert_eq!(
            config.command,
            Command::Search {
                user_agents: vec!["curl/7.0".to_string(), "Wget/1.0".to_string()]
            }
        );
    }

    #[test]
    fn test_bench_monitor_flag() {
        let config = CliConfig::try_parse_from(["browscapy", "bench", "--monitor", "-v"]).unwrap();
        assert!(config.verbose);
        assert!(config.settings().unwrap().monitor);
    }

    #[test]
    fn test_invalid_url_flag() {
        let config = CliConfig::try_parse_from(["browscapy", "--url", "ftp://x", "fetch"]).unwrap();
        assert!(config.settings().is_err());
    }
}
