pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{HttpSource, LocalStorage};
pub use config::Settings;
pub use crate::core::{
    bench::{BenchReport, BenchRunner},
    database::{Database, DatabaseBuilder},
    fetch::{FetchOutcome, Fetcher},
    search::Browscapy,
};
pub use domain::model::LookupResult;
pub use domain::ports::Detector;
pub use utils::error::{BrowscapError, Result};
