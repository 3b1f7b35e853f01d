use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Printed by the harness when no pattern matched a user agent.
pub const NO_MATCH: &str = "-";

/// One browscap.csv row, keyed by column name.
///
/// Cells holding `true`/`false` are stored as JSON booleans, everything else
/// as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Properties {
    pub fn from_row<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let data = headers
            .into_iter()
            .zip(values)
            .map(|(name, cell)| {
                let value = match cell {
                    "true" => serde_json::Value::Bool(true),
                    "false" => serde_json::Value::Bool(false),
                    other => serde_json::Value::String(other.to_string()),
                };
                (name.to_string(), value)
            })
            .collect();
        Self { data }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.data.get(name).and_then(|v| v.as_bool())
    }

    /// The browscap pattern this row was generated for.
    pub fn pattern(&self) -> Option<&str> {
        self.get_str("PropertyName")
    }

    pub fn browser(&self) -> Option<&str> {
        self.get_str("Browser")
    }

    pub fn version(&self) -> Option<&str> {
        self.get_str("Version")
    }

    pub fn platform(&self) -> Option<&str> {
        self.get_str("Platform")
    }

    pub fn device_type(&self) -> Option<&str> {
        self.get_str("Device_Type")
    }

    pub fn is_mobile_device(&self) -> bool {
        self.get_bool("isMobileDevice").unwrap_or(false)
    }

    pub fn is_crawler(&self) -> bool {
        self.get_bool("Crawler").unwrap_or(false)
    }
}

/// Version header found in the first two lines of browscap.csv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowscapVersion {
    pub version: String,
    pub released: String,
}

/// Answer of a [`Detector`](crate::domain::ports::Detector) for one user agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Identifier printed by the benchmark harness. For browscap lookups this
    /// is the matched pattern, or [`NO_MATCH`].
    pub browser_name: String,
    pub pattern: Option<String>,
    pub properties: Option<Properties>,
}

impl LookupResult {
    pub fn named(browser_name: impl Into<String>) -> Self {
        Self {
            browser_name: browser_name.into(),
            pattern: None,
            properties: None,
        }
    }

    pub fn no_match() -> Self {
        Self::named(NO_MATCH)
    }

    pub fn is_match(&self) -> bool {
        self.pattern.is_some()
    }
}

/// Freshness answer of a remote browscap source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    NotModified,
    Modified { last_modified: Option<DateTime<Utc>> },
}
