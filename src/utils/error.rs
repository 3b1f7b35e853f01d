use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowscapError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("browscap.csv not found at {path}")]
    CsvNotFound { path: String },

    #[error("Pattern cache not found at {path}")]
    CacheNotFound { path: String },

    #[error("Invalid browscap.csv at record {record}: {message}")]
    InvalidCsv { record: u64, message: String },

    #[error("Duplicate pattern: {pattern}")]
    DuplicatePattern { pattern: String },

    #[error("Remote server answered {status} for {url}")]
    RemoteStatus { status: u16, url: String },

    #[error("Invalid Last-Modified header '{value}': {reason}")]
    InvalidLastModified { value: String, reason: String },

    #[error("Lookup failed for '{user_agent}': {message}")]
    LookupError { user_agent: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BrowscapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::RemoteStatus { .. } | Self::InvalidLastModified { .. } => {
                ErrorCategory::Network
            }
            Self::CsvError(_) | Self::InvalidCsv { .. } | Self::DuplicatePattern { .. } => {
                ErrorCategory::Data
            }
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvNotFound { .. }
            | Self::CacheNotFound { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::LookupError { .. } => ErrorCategory::Lookup,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicatePattern { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::RemoteStatus { .. } | Self::InvalidLastModified { .. } => {
                ErrorSeverity::Medium
            }
            Self::CsvError(_)
            | Self::InvalidCsv { .. }
            | Self::CsvNotFound { .. }
            | Self::CacheNotFound { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::LookupError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::RemoteStatus { .. } => {
                "Check the network connection and the source URL, then retry the fetch"
            }
            Self::InvalidLastModified { .. } => "Retry with --force to skip the freshness check",
            Self::CsvError(_) | Self::InvalidCsv { .. } => {
                "Delete browscap.csv and run fetch again to get a clean copy"
            }
            Self::CsvNotFound { .. } => "Did you run fetch?",
            Self::CacheNotFound { .. } => "Did you run convert?",
            Self::DuplicatePattern { .. } => "The first occurrence of the pattern is kept",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the configuration file and command line flags"
            }
            Self::LookupError { .. } => "Rebuild the pattern cache with convert",
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check permissions and free space in the cache folder"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach browscap.org: {}", self),
            ErrorCategory::Data => format!("browscap.csv could not be read: {}", self),
            ErrorCategory::Storage => format!("Cache folder problem: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Lookup => format!("User-agent lookup failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrowscapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_point_to_previous_step() {
        let csv = BrowscapError::CsvNotFound {
            path: "/tmp/browscap.csv".to_string(),
        };
        assert_eq!(csv.recovery_suggestion(), "Did you run fetch?");
        assert_eq!(csv.category(), ErrorCategory::Storage);

        let cache = BrowscapError::CacheNotFound {
            path: "/tmp/cache.json".to_string(),
        };
        assert_eq!(cache.recovery_suggestion(), "Did you run convert?");
        assert_eq!(cache.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_network_errors_are_retryable() {
        let err = BrowscapError::RemoteStatus {
            status: 503,
            url: "http://browscap.org".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("503"));
    }
}
