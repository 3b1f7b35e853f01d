pub mod bench;
pub mod convert;
pub mod database;
pub mod fetch;
pub mod matcher;
pub mod pattern;
pub mod search;
pub mod tree;

pub use crate::domain::model::{BrowscapVersion, LookupResult, Properties, RemoteStatus};
pub use crate::domain::ports::{ConfigProvider, Detector, RemoteSource, Storage};
pub use crate::utils::error::Result;
