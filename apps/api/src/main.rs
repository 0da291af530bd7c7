mod accounts;
mod config;
mod conversation;
mod db;
mod errors;
mod llm_client;
mod models;
mod plans;
mod routes;
mod state;
mod templates;
mod uploads;
mod users;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::PgAccounts;
use crate::config::Config;
use crate::conversation::store::ConversationStore;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::engine::ChatEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing DATABASE_URL / OPENAI_API_KEY
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR Desk API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    let llm = LlmClient::new(config.openai_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store = ConversationStore::new();
    if let Some(ttl) = config.conversation_ttl {
        store.spawn_sweeper(ttl);
    } else {
        info!("Conversation eviction disabled; conversations live until restart");
    }

    let state = AppState {
        db: db.clone(),
        engine: ChatEngine::new(store, Arc::new(llm)),
        accounts: Arc::new(PgAccounts::new(db)),
        config: config.clone(),
    };

    if config.enforce_plan_limits {
        info!("Plan limits enforced on chat and uploads");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
