use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reference to an image archived in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    /// Object-store key, `<uuid>.jpg`.
    pub file_id: String,
}
