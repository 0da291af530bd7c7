//! Account lookups consumed by the chat endpoint and plan-gated routes.
//!
//! `AppState` holds an `Arc<dyn AccountLookup>`; the Postgres implementation is
//! used in production and tests substitute a stub. No caching: every call hits
//! the database.

pub mod entitlements;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::uploads::context::build_file_context;

#[async_trait]
pub trait AccountLookup: Send + Sync {
    /// Features JSON of the user's plan. `None` when the user or plan is missing.
    async fn plan_features(&self, user_id: i32) -> Result<Option<Value>, AppError>;

    /// Concatenated text of the user's uploaded documents.
    async fn file_context(&self, user_id: i32) -> Result<String, AppError>;

    async fn has_feature(&self, user_id: i32, feature: &str) -> Result<bool, AppError> {
        Ok(self
            .plan_features(user_id)
            .await?
            .map(|features| entitlements::feature_enabled(&features, feature))
            .unwrap_or(false))
    }

    /// Errors with a 403 and an upgrade hint when the feature is missing.
    async fn require_feature(&self, user_id: i32, feature: &str) -> Result<(), AppError> {
        if self.has_feature(user_id, feature).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(
                entitlements::denial_message(feature),
                Some(entitlements::upgrade_plan_for(feature)),
            ))
        }
    }
}

pub struct PgAccounts {
    pool: PgPool,
}

impl PgAccounts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountLookup for PgAccounts {
    async fn plan_features(&self, user_id: i32) -> Result<Option<Value>, AppError> {
        let features: Option<Value> = sqlx::query_scalar(
            r#"
            SELECT p.features
            FROM users u
            JOIN plans p ON p.id = u.plan_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(features)
    }

    async fn file_context(&self, user_id: i32) -> Result<String, AppError> {
        let files: Vec<(String, String)> = sqlx::query_as(
            "SELECT filename, content FROM uploaded_files WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(build_file_context(&files))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    /// In-memory `AccountLookup` keyed by user id.
    #[derive(Default)]
    pub(crate) struct StubAccounts {
        pub(crate) plans: HashMap<i32, Value>,
        pub(crate) files: HashMap<i32, String>,
    }

    #[async_trait]
    impl AccountLookup for StubAccounts {
        async fn plan_features(&self, user_id: i32) -> Result<Option<Value>, AppError> {
            Ok(self.plans.get(&user_id).cloned())
        }

        async fn file_context(&self, user_id: i32) -> Result<String, AppError> {
            Ok(self.files.get(&user_id).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_missing_plan_has_no_features() {
        let accounts = StubAccounts::default();
        assert!(!accounts.has_feature(7, entitlements::AI_AGENT).await.unwrap());
    }

    #[tokio::test]
    async fn test_require_feature_returns_upgrade_hint() {
        let mut accounts = StubAccounts::default();
        accounts.plans.insert(1, json!({"file_upload": false}));

        let err = accounts
            .require_feature(1, entitlements::FILE_UPLOAD)
            .await
            .unwrap_err();

        match err {
            AppError::Forbidden {
                message,
                upgrade_plan,
            } => {
                assert_eq!(message, "File upload requires Self-Serve plan or higher");
                assert_eq!(upgrade_plan.as_deref(), Some("Self-Serve"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_require_feature_passes_when_enabled() {
        let mut accounts = StubAccounts::default();
        accounts.plans.insert(1, json!({"ai_agent": true}));
        assert!(accounts.require_feature(1, entitlements::AI_AGENT).await.is_ok());
    }
}
