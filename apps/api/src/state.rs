use std::sync::Arc;

use sqlx::PgPool;

use crate::accounts::AccountLookup;
use crate::config::Config;
use crate::workflow::engine::ChatEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Workflow engine. Owns the in-memory conversation store.
    pub engine: ChatEngine,
    /// Plan features and uploaded-file text. Default: `PgAccounts`.
    pub accounts: Arc<dyn AccountLookup>,
    pub config: Config,
}
