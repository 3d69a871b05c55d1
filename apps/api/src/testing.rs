//! In-memory collaborator doubles for service and route tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::apod_client::PictureSource;
use crate::models::entry::{Entry, MediaType, StoredEntry};
use crate::models::file::FileRecord;
use crate::repository::EntryRepository;
use crate::storage::ObjectStore;

pub fn sample_entry(date: &str, media_type: &str) -> Entry {
    Entry {
        copyright: "Jane Doe".to_string(),
        date: date.to_string(),
        explanation: "Spiral arms & dust lanes <in> infrared.".to_string(),
        hdurl: Some(format!("https://apod.nasa.gov/apod/image/{date}_hd.jpg")),
        media_type: MediaType::from(media_type.to_string()),
        service_version: "v1".to_string(),
        title: "A Galaxy".to_string(),
        url: format!("https://apod.nasa.gov/apod/image/{date}.jpg"),
    }
}

pub struct FakeSource {
    entry: Mutex<Entry>,
    fetch_error: Option<String>,
    fail_download: bool,
    fetches: AtomicUsize,
    downloads: AtomicUsize,
}

impl FakeSource {
    pub const IMAGE_BYTES: &'static [u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    pub fn returning(entry: Entry) -> Self {
        Self {
            entry: Mutex::new(entry),
            fetch_error: None,
            fail_download: false,
            fetches: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn failing_fetch(message: &str) -> Self {
        Self {
            fetch_error: Some(message.to_string()),
            ..Self::returning(sample_entry("2023-05-01", "image"))
        }
    }

    pub fn with_failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn set_entry(&self, entry: Entry) {
        *self.entry.lock().unwrap() = entry;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PictureSource for FakeSource {
    async fn fetch_entry(&self, _api_key: &str, _date: &str) -> Result<Entry> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fetch_error {
            bail!("{message}");
        }
        Ok(self.entry.lock().unwrap().clone())
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_download {
            bail!("GET {url}: 404 Not Found");
        }
        Ok(Bytes::from_static(Self::IMAGE_BYTES))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<(String, Bytes)>>,
    fail: bool,
    uploads: AtomicUsize,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(&self, body: Bytes, key: &str) -> Result<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("access denied");
        }
        self.objects.lock().unwrap().push((key.to_string(), body));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    files: Mutex<Vec<FileRecord>>,
    entries: Mutex<Vec<(Uuid, Entry, Uuid)>>,
    fail_file_insert: bool,
    fail_entry_insert: bool,
    fail_query: bool,
    file_inserts: AtomicUsize,
    entry_inserts: AtomicUsize,
}

impl MemoryRepository {
    pub fn with_failing_file_insert(mut self) -> Self {
        self.fail_file_insert = true;
        self
    }

    pub fn with_failing_entry_insert(mut self) -> Self {
        self.fail_entry_insert = true;
        self
    }

    pub fn with_failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn file_insert_calls(&self) -> usize {
        self.file_inserts.load(Ordering::SeqCst)
    }

    pub fn entry_insert_calls(&self) -> usize {
        self.entry_inserts.load(Ordering::SeqCst)
    }

    pub fn file_records(&self) -> Vec<FileRecord> {
        self.files.lock().unwrap().clone()
    }

    pub fn last_entry_id(&self) -> Option<Uuid> {
        self.entries.lock().unwrap().last().map(|(id, _, _)| *id)
    }
}

#[async_trait]
impl EntryRepository for MemoryRepository {
    async fn insert_file_record(&self, key: &str) -> Result<FileRecord> {
        self.file_inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_file_insert {
            bail!("cannot save file id: pool timed out");
        }
        let record = FileRecord {
            id: Uuid::new_v4(),
            file_id: key.to_string(),
        };
        self.files.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn insert_entry(&self, entry: &Entry, file_record_id: Uuid) -> Result<Uuid> {
        self.entry_inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_entry_insert {
            bail!("cannot save entry: pool timed out");
        }
        if !self.files.lock().unwrap().iter().any(|f| f.id == file_record_id) {
            bail!("foreign key violation: files.id {file_record_id}");
        }
        let id = Uuid::new_v4();
        self.entries
            .lock()
            .unwrap()
            .push((id, entry.clone(), file_record_id));
        Ok(id)
    }

    async fn query_entries(&self, date: Option<&str>) -> Result<Vec<StoredEntry>> {
        if self.fail_query {
            bail!("error with query executing: relation \"entries\" does not exist");
        }
        let files = self.files.lock().unwrap();
        let entries = self.entries.lock().unwrap();
        let stored = entries
            .iter()
            .filter(|(_, entry, _)| date.map_or(true, |d| entry.date == d))
            .map(|(id, entry, file_record_id)| -> Result<StoredEntry> {
                let file = files
                    .iter()
                    .find(|f| f.id == *file_record_id)
                    .ok_or_else(|| anyhow!("dangling file reference {file_record_id}"))?;
                let now = Utc::now();
                Ok(StoredEntry {
                    id: *id,
                    file_id: file.file_id.clone(),
                    copyright: entry.copyright.clone(),
                    date: entry.date.clone(),
                    explanation: entry.explanation.clone(),
                    hd_url: entry.hdurl.clone(),
                    media_type: entry.media_type.to_string(),
                    service_version: entry.service_version.clone(),
                    title: entry.title.clone(),
                    url: entry.url.clone(),
                    created: now,
                    updated: now,
                })
            })
            .collect();
        stored
    }
}
