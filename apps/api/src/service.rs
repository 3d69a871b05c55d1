//! Fetch-and-archive pipeline for picture-of-the-day entries.
//!
//! Every step runs once, in order, and the first failure ends the run. A
//! failure after the upload leaves the object (and possibly the file record)
//! behind; nothing is rolled back.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::apod_client::PictureSource;
use crate::errors::AppError;
use crate::models::entry::StoredEntry;
use crate::repository::EntryRepository;
use crate::storage::ObjectStore;
use crate::validation::validate_request;

const IMAGE_EXTENSION: &str = ".jpg";

/// Orchestrates the APOD API, the object store and the relational store.
#[derive(Clone)]
pub struct ApodService {
    source: Arc<dyn PictureSource>,
    store: Arc<dyn ObjectStore>,
    repo: Arc<dyn EntryRepository>,
}

impl ApodService {
    pub fn new(
        source: Arc<dyn PictureSource>,
        store: Arc<dyn ObjectStore>,
        repo: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            source,
            store,
            repo,
        }
    }

    /// Fetches the entry for `date` (latest when empty), archives its image and
    /// metadata, and returns the id of the stored entry.
    pub async fn fetch_and_save(&self, api_key: &str, date: &str) -> Result<Uuid, AppError> {
        validate_request(date, api_key)?;

        let entry = self
            .source
            .fetch_entry(api_key, date)
            .await
            .map_err(AppError::UpstreamFetch)?;

        if !entry.media_type.is_image() {
            info!(date = %entry.date, media_type = %entry.media_type, "Skipping non-image entry");
            return Err(AppError::UnsupportedMediaType(entry.media_type.to_string()));
        }

        let image = self
            .source
            .download(&entry.url)
            .await
            .map_err(AppError::ImageRetrieval)?;

        let key = generate_storage_key();
        self.store
            .upload(image, &key)
            .await
            .map_err(AppError::ObjectStorage)?;

        let file = self
            .repo
            .insert_file_record(&key)
            .await
            .map_err(AppError::FileRecordPersistence)?;

        let id = self
            .repo
            .insert_entry(&entry, file.id)
            .await
            .map_err(AppError::EntryPersistence)?;

        info!(%id, date = %entry.date, key = %key, "Picture archived");
        Ok(id)
    }

    /// Lists stored entries, filtered to an exact date when `date` is non-empty.
    pub async fn list_entries(&self, date: &str) -> Result<Vec<StoredEntry>, AppError> {
        let filter = (!date.is_empty()).then_some(date);
        self.repo
            .query_entries(filter)
            .await
            .map_err(AppError::EntryQuery)
    }
}

fn generate_storage_key() -> String {
    format!("{}{IMAGE_EXTENSION}", Uuid::new_v4())
}
