use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileRow {
    pub id: i32,
    pub user_id: i32,
    pub filename: String,
    /// Extracted plain text; empty when extraction failed or the type is unsupported.
    pub content: String,
    pub created_at: DateTime<Utc>,
}
