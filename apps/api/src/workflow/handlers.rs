//! Axum route handlers for chat and conversation inspection.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::accounts::entitlements::{AI_AGENT, FILE_UPLOAD};
use crate::conversation::store::Conversation;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::engine::{ChatReply, ChatTurn};
use crate::workflow::prompts::HELP_FALLBACK;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub conversation_id: Option<String>,
    pub user_id: Option<i32>,
    pub file_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub conversation: Option<Conversation>,
}

/// POST /api/chat
///
/// An empty message is a 400 and a missing plan feature is a 403. Any other
/// failure becomes a friendly reply, never an error status.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;

    if let (true, Some(user_id)) = (state.config.enforce_plan_limits, req.user_id) {
        match state.accounts.require_feature(user_id, AI_AGENT).await {
            Ok(()) => {}
            Err(denied @ AppError::Forbidden { .. }) => return Err(denied),
            Err(e) => warn!("Entitlement lookup failed for user {user_id}: {e}"),
        }
    }

    let file_context = match req.file_context.filter(|c| !c.trim().is_empty()) {
        Some(context) => Some(context),
        None => match req.user_id {
            Some(user_id) => stored_file_context(&state, user_id).await,
            None => None,
        },
    };

    let turn = ChatTurn {
        conversation_id: req.conversation_id.clone(),
        message,
        file_context,
    };

    match state.engine.handle(turn).await {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!("Chat turn failed: {e}");
            Ok(Json(help_fallback(req.conversation_id)))
        }
    }
}

/// Reply for a turn the engine could not record. Keeps the caller's id when given.
fn help_fallback(conversation_id: Option<String>) -> ChatReply {
    ChatReply {
        reply: HELP_FALLBACK.to_string(),
        conversation_id: conversation_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        is_complete: false,
    }
}

/// GET /api/debug/conversations
pub async fn handle_list_conversations(State(state): State<AppState>) -> Json<ConversationsResponse> {
    Json(ConversationsResponse {
        conversations: state.engine.store().snapshot().await,
    })
}

/// DELETE /api/debug/conversations
pub async fn handle_clear_conversations(State(state): State<AppState>) -> Json<ClearedResponse> {
    let cleared = state.engine.store().clear().await;
    info!("Cleared {cleared} conversations");
    Json(ClearedResponse { cleared })
}

/// GET /api/debug/conversations/:id
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Json<ConversationResponse> {
    let conversation = state.engine.store().conversation(&conversation_id).await;
    Json(ConversationResponse {
        conversation_id,
        conversation,
    })
}

/// Upload text for users whose plan includes uploads. Lookup failures are logged
/// and the turn proceeds without file context.
async fn stored_file_context(state: &AppState, user_id: i32) -> Option<String> {
    match lookup_file_context(state, user_id).await {
        Ok(context) => context.filter(|c| !c.is_empty()),
        Err(e) => {
            warn!("File context lookup failed for user {user_id}: {e}");
            None
        }
    }
}

async fn lookup_file_context(state: &AppState, user_id: i32) -> Result<Option<String>, AppError> {
    if !state.accounts.has_feature(user_id, FILE_UPLOAD).await? {
        return Ok(None);
    }
    Ok(Some(state.accounts.file_context(user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_fallback_keeps_caller_id() {
        let reply = help_fallback(Some("conv-42".to_string()));
        assert_eq!(reply.reply, HELP_FALLBACK);
        assert_eq!(reply.conversation_id, "conv-42");
        assert!(!reply.is_complete);
    }

    #[test]
    fn test_help_fallback_generates_id_when_missing() {
        let generated = help_fallback(None);
        assert!(Uuid::parse_str(&generated.conversation_id).is_ok());

        let blank = help_fallback(Some("  ".to_string()));
        assert_ne!(blank.conversation_id.trim(), "");
        assert!(blank.reply.starts_with("I'm here to help"));
    }
}
