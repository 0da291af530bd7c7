use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRow {
    pub id: i32,
    pub title: String,
    pub category: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
