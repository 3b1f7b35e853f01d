use crate::domain::model::RemoteStatus;
use crate::domain::ports::RemoteSource;
use crate::utils::error::{BrowscapError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "http://browscap.org/stream?q=BrowsCapCSV";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// browscap.csv served over HTTP.
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn check(&self, local_modified: Option<DateTime<Utc>>) -> Result<RemoteStatus> {
        let mut request = self.client.head(&self.url);
        if let Some(local) = local_modified {
            let since = format_http_date(local);
            tracing::info!("Local file date:  {}", since);
            request = request.header(IF_MODIFIED_SINCE, since);
        }

        let response = request.send().await?;
        tracing::debug!("HEAD {} answered {}", self.url, response.status());

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(RemoteStatus::NotModified);
        }
        if !response.status().is_success() {
            return Err(BrowscapError::RemoteStatus {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let last_modified = match response.headers().get(LAST_MODIFIED) {
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|e| BrowscapError::InvalidLastModified {
                        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        reason: e.to_string(),
                    })?;
                tracing::info!("Remote file date: {}", value);
                Some(parse_http_date(value)?)
            }
            None => {
                tracing::warn!("Remote server sent no Last-Modified header");
                None
            }
        };

        Ok(RemoteStatus::Modified { last_modified })
    }

    async fn download(&self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(BrowscapError::RemoteStatus {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| BrowscapError::InvalidLastModified {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
