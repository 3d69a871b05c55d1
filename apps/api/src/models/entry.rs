use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Media kind reported by the APOD API. Only images are archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Image => "image",
            MediaType::Other(other) => other,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaType::Image)
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        if value == "image" {
            MediaType::Image
        } else {
            MediaType::Other(value)
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        match value {
            MediaType::Image => "image".to_string(),
            MediaType::Other(other) => other,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A picture-of-the-day record as returned by the APOD API.
/// Request scoped; never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Absent for public-domain pictures.
    #[serde(default)]
    pub copyright: String,
    pub date: String,
    pub explanation: String,
    #[serde(default)]
    pub hdurl: Option<String>,
    pub media_type: MediaType,
    #[serde(default)]
    pub service_version: String,
    pub title: String,
    pub url: String,
}

/// An archived entry joined with the storage key of its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoredEntry {
    pub id: Uuid,
    /// Object-store key of the archived image (`files.file_id`).
    pub file_id: String,
    pub copyright: String,
    pub date: String,
    pub explanation: String,
    #[serde(rename = "hdurl")]
    pub hd_url: Option<String>,
    pub media_type: String,
    pub service_version: String,
    pub title: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
