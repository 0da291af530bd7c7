use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A subscription tier. `features` is a free-form JSON object, e.g.
/// `{"templates": 20, "ai_agent": true, "file_upload": true}`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub id: i32,
    pub name: String,
    /// Monthly price in cents.
    pub price: i32,
    pub features: Value,
    pub created_at: DateTime<Utc>,
}
