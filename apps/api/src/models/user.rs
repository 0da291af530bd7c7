use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub plan_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}
