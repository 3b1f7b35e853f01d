use crate::core::convert::CSV_FILE;
use crate::domain::model::RemoteStatus;
use crate::domain::ports::{RemoteSource, Storage};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded {
        path: String,
        bytes: usize,
        last_modified: Option<DateTime<Utc>>,
    },
    UpToDate,
}

/// Keeps the local browscap.csv in sync with a remote source.
pub struct Fetcher<'a, S: Storage, R: RemoteSource> {
    storage: &'a S,
    source: &'a R,
    force: bool,
}

impl<'a, S: Storage, R: RemoteSource> Fetcher<'a, S, R> {
    pub fn new(storage: &'a S, source: &'a R) -> Self {
        Self {
            storage,
            source,
            force: false,
        }
    }

    /// Download even when the local copy looks current.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub async fn update(&self) -> Result<FetchOutcome> {
        let local = self.storage.modified_time(CSV_FILE).await?;

        match self.source.check(local).await? {
            RemoteStatus::NotModified if !self.force => {
                tracing::info!("Remote answered 304, no newer remote file available.");
                Ok(FetchOutcome::UpToDate)
            }
            RemoteStatus::NotModified => self.download(None).await,
            RemoteStatus::Modified { last_modified } => {
                if self.force || is_newer(local, last_modified) {
                    self.download(last_modified).await
                } else {
                    tracing::info!("No newer remote file available.");
                    Ok(FetchOutcome::UpToDate)
                }
            }
        }
    }

    async fn download(&self, last_modified: Option<DateTime<Utc>>) -> Result<FetchOutcome> {
        tracing::info!("Downloading browscap.csv...");
        let data = self.source.download().await?;
        self.storage.write_file(CSV_FILE, &data).await?;

        let path = self.storage.location(CSV_FILE);
        tracing::info!("Downloaded {} ({} bytes)", path, data.len());

        // Stamp the file with the server time so the next check compares
        // like with like.
        if let Some(remote) = last_modified {
            self.storage.set_modified_time(CSV_FILE, remote).await?;
        }

        Ok(FetchOutcome::Downloaded {
            path,
            bytes: data.len(),
            last_modified,
        })
    }
}

/// Whole-second comparison: HTTP dates carry no sub-second part.
fn is_newer(local: Option<DateTime<Utc>>, remote: Option<DateTime<Utc>>) -> bool {
    match (local, remote) {
        (Some(local), Some(remote)) => local.timestamp() < remote.timestamp(),
        _ => true,
    }
}
