//! Chat Engine: routes each chat turn through the workflow state machine.
//!
//! Flow: get_or_create conversation → lock it → trigger detection (only when no
//!       run exists) → workflow step handler or general chat → record reply.
//!
//! Every workflow has the same shape: `Initial` → `CollectingDetails` → `Complete`.
//! LLM failures are turned into fixed replies here; the step is left untouched so
//! the user's next message retries the generation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::conversation::models::{ContextUpdate, Role, Step, USER_INPUT_DETAIL};
use crate::conversation::store::{Conversation, ConversationStore, StoreError};
use crate::llm_client::prompts::{with_file_context, GENERAL_HR_SYSTEM};
use crate::llm_client::{
    ChatMessage, ChatModel, CompletionRequest, FOCUSED_TEMPERATURE, STANDARD_TEMPERATURE,
};
use crate::workflow::definitions::WorkflowDefinition;
use crate::workflow::prompts::{
    apology, completion_reply, GENERAL_CHAT_FALLBACK, MORE_DETAILS_PROMPT,
    WORKFLOW_USER_PROMPT_TEMPLATE,
};
use crate::workflow::triggers;

/// Messages of history sent with a general chat call.
pub const HISTORY_WINDOW: usize = 10;
pub const GENERAL_CHAT_MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("conversation state error: {0}")]
    Store(#[from] StoreError),
}

/// One inbound user message.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub conversation_id: Option<String>,
    pub message: String,
    /// Text of the user's uploaded documents, appended to system prompts.
    pub file_context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    pub is_complete: bool,
}

#[derive(Clone)]
pub struct ChatEngine {
    store: ConversationStore,
    llm: Arc<dyn ChatModel>,
}

impl ChatEngine {
    pub fn new(store: ConversationStore, llm: Arc<dyn ChatModel>) -> Self {
        Self { store, llm }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Handles one turn. The conversation stays locked until the reply is recorded.
    pub async fn handle(&self, turn: ChatTurn) -> Result<ChatReply, EngineError> {
        let id = self
            .store
            .get_or_create(turn.conversation_id.as_deref())
            .await;
        let mut conversation = self.store.lock(&id).await;

        if conversation.context.run.is_none() {
            if let Some(kind) = triggers::detect(&turn.message) {
                info!(conversation_id = %id, workflow = %kind, "Workflow triggered");
                conversation.update(ContextUpdate::begin(kind))?;
            }
        }

        let workflow = conversation.context.workflow();
        conversation.push(Role::User, turn.message.as_str(), workflow);

        let file_context = turn.file_context.as_deref();
        let reply = match workflow {
            Some(kind) => {
                self.advance_workflow(&mut conversation, kind.definition(), &turn.message, file_context)
                    .await?
            }
            None => self.general_chat(&conversation, file_context).await,
        };

        conversation.push(Role::Assistant, reply.as_str(), workflow);

        Ok(ChatReply {
            reply,
            conversation_id: id,
            is_complete: conversation.context.workflow_complete(),
        })
    }

    async fn advance_workflow(
        &self,
        conversation: &mut Conversation,
        def: &WorkflowDefinition,
        message: &str,
        file_context: Option<&str>,
    ) -> Result<String, EngineError> {
        match conversation.context.step().clone() {
            Step::Initial => {
                conversation.update(ContextUpdate::step(Step::CollectingDetails))?;
                Ok(def.instructions.to_string())
            }
            Step::CollectingDetails => {
                conversation.update(ContextUpdate::default().with_detail(USER_INPUT_DETAIL, message))?;

                if let Some(min) = def.min_detail_chars {
                    if message.chars().count() <= min {
                        return Ok(MORE_DETAILS_PROMPT.to_string());
                    }
                }

                let request = workflow_request(def, &conversation.context.details, file_context);
                match self.llm.complete(request).await {
                    Ok(document) => {
                        info!(
                            conversation_id = %conversation.id,
                            workflow = %def.kind,
                            "Workflow complete"
                        );
                        let reply = completion_reply(def.title, &document);
                        conversation.update(ContextUpdate::step(Step::Complete { document }))?;
                        Ok(reply)
                    }
                    Err(e) => {
                        warn!(
                            conversation_id = %conversation.id,
                            workflow = %def.kind,
                            "Document generation failed: {e}"
                        );
                        Ok(apology(def.title))
                    }
                }
            }
            Step::Complete { document } => Ok(document),
        }
    }

    async fn general_chat(&self, conversation: &Conversation, file_context: Option<&str>) -> String {
        let messages = conversation
            .recent(HISTORY_WINDOW)
            .iter()
            .map(|m| match m.role {
                Role::User => ChatMessage::user(m.content.as_str()),
                Role::Assistant => ChatMessage::assistant(m.content.as_str()),
            })
            .collect();

        let request = CompletionRequest {
            system: with_file_context(GENERAL_HR_SYSTEM, file_context),
            messages,
            temperature: STANDARD_TEMPERATURE,
            max_tokens: GENERAL_CHAT_MAX_TOKENS,
        };

        match self.llm.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(conversation_id = %conversation.id, "General chat failed: {e}");
                GENERAL_CHAT_FALLBACK.to_string()
            }
        }
    }
}

fn workflow_request(
    def: &WorkflowDefinition,
    details: &BTreeMap<String, String>,
    file_context: Option<&str>,
) -> CompletionRequest {
    let prompt = WORKFLOW_USER_PROMPT_TEMPLATE
        .replace("{title}", def.title)
        .replace("{sections}", &render_sections(def.sections))
        .replace("{details}", &render_details(details));

    CompletionRequest {
        system: with_file_context(def.system_prompt, file_context),
        messages: vec![ChatMessage::user(prompt)],
        temperature: FOCUSED_TEMPERATURE,
        max_tokens: def.max_tokens,
    }
}

/// Numbered headings, one per line.
fn render_sections(sections: &[&str]) -> String {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {section}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The raw answer first, then any other collected fields as `key: value` lines.
fn render_details(details: &BTreeMap<String, String>) -> String {
    let mut lines = Vec::with_capacity(details.len());
    if let Some(input) = details.get(USER_INPUT_DETAIL) {
        lines.push(input.clone());
    }
    lines.extend(
        details
            .iter()
            .filter(|(k, _)| k.as_str() != USER_INPUT_DETAIL)
            .map(|(k, v)| format!("{k}: {v}")),
    );
    lines.join("\n")
}
