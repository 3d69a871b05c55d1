//! APOD client: the single point of entry for calls to the picture-of-the-day
//! API and for downloading the pictures it points at.
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::models::entry::Entry;

/// Source of picture-of-the-day entries and their image bytes.
///
/// Carried by the service as `Arc<dyn PictureSource>`.
#[async_trait]
pub trait PictureSource: Send + Sync {
    /// Fetches the entry for `date`, or the provider's latest when `date` is empty.
    async fn fetch_entry(&self, api_key: &str, date: &str) -> Result<Entry>;

    /// Downloads the raw bytes behind `url`.
    async fn download(&self, url: &str) -> Result<Bytes>;
}

/// reqwest-backed client. No timeout or retry policy is applied here.
#[derive(Clone)]
pub struct ApodClient {
    client: Client,
    api_url: String,
}

impl ApodClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl PictureSource for ApodClient {
    async fn fetch_entry(&self, api_key: &str, date: &str) -> Result<Entry> {
        let mut request = self.client.get(&self.api_url).query(&[("api_key", api_key)]);
        if !date.is_empty() {
            request = request.query(&[("date", date)]);
        }

        let entry: Entry = request
            .send()
            .await
            .context("request failed")?
            .error_for_status()?
            .json()
            .await
            .context("unable to decode response")?;

        debug!(date = %entry.date, media_type = %entry.media_type, "APOD entry fetched");
        Ok(entry)
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .bytes()
            .await
            .context("unable to read image body")?;

        debug!(url, size = bytes.len(), "Image downloaded");
        Ok(bytes)
    }
}
