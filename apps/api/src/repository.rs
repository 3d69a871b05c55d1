use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::entry::{Entry, StoredEntry};
use crate::models::file::FileRecord;

/// Relational store for archived entries and their file references.
///
/// Inserts only; rows are never updated or deleted by this service.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Records the object-store key of an uploaded picture.
    async fn insert_file_record(&self, key: &str) -> Result<FileRecord>;

    /// Persists an entry pointing at `file_record_id`, returning its generated id.
    async fn insert_entry(&self, entry: &Entry, file_record_id: Uuid) -> Result<Uuid>;

    /// All stored entries, or only those whose date equals `date` exactly.
    async fn query_entries(&self, date: Option<&str>) -> Result<Vec<StoredEntry>>;
}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgRepository {
    async fn insert_file_record(&self, key: &str) -> Result<FileRecord> {
        let record = sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (file_id) VALUES ($1) RETURNING id, file_id",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await
        .context("cannot save file id")?;

        info!("Inserted file record {} for key {}", record.id, record.file_id);
        Ok(record)
    }

    async fn insert_entry(&self, entry: &Entry, file_record_id: Uuid) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO entries
                (file_id, copyright, date, explanation, hd_url,
                 media_type, service_version, title, url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(file_record_id)
        .bind(&entry.copyright)
        .bind(&entry.date)
        .bind(&entry.explanation)
        .bind(entry.hdurl.as_deref())
        .bind(entry.media_type.as_str())
        .bind(&entry.service_version)
        .bind(&entry.title)
        .bind(&entry.url)
        .fetch_one(&self.pool)
        .await
        .context("cannot save entry")?;

        info!("Inserted entry {id} for {}", entry.date);
        Ok(id)
    }

    async fn query_entries(&self, date: Option<&str>) -> Result<Vec<StoredEntry>> {
        Ok(sqlx::query_as::<_, StoredEntry>(
            r#"
            SELECT entries.id, files.file_id, copyright, date, explanation, hd_url,
                   media_type, service_version, title, url,
                   entries.created, entries.updated
            FROM entries
            JOIN files ON entries.file_id = files.id
            WHERE $1::TEXT IS NULL OR date = $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .context("error with query executing")?)
    }
}
