use crate::domain::model::{LookupResult, RemoteStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Capability-detection collaborator queried by the benchmark runner.
pub trait Detector {
    fn lookup(&self, user_agent: &str) -> Result<LookupResult>;
}

impl<D: Detector + ?Sized> Detector for &D {
    fn lookup(&self, user_agent: &str) -> Result<LookupResult> {
        (**self).lookup(user_agent)
    }
}

/// Cache folder holding browscap.csv and the converted pattern cache.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// `None` when the file does not exist.
    fn modified_time(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>>> + Send;
    fn set_modified_time(
        &self,
        path: &str,
        time: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human readable location of `path`, for messages.
    fn location(&self, path: &str) -> String;
}

/// Where browscap.csv is downloaded from.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn check(&self, local_modified: Option<DateTime<Utc>>) -> Result<RemoteStatus>;
    async fn download(&self) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn cache_folder(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn case_insensitive_fallback(&self) -> bool;
    fn monitoring_enabled(&self) -> bool;
}
