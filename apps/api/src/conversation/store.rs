//! Conversation Store: in-memory conversation logs and workflow contexts.
//!
//! Constructed once at startup and shared through `AppState`. Entries are created
//! lazily on first reference and live until `clear()` or idle eviction.
//!
//! Each conversation sits behind its own mutex. The engine holds that lock for a
//! whole turn (read context → LLM call → write context), so concurrent turns on
//! the same id run one after another while different ids proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::conversation::models::{Context, ContextUpdate, Message, Role};
use crate::workflow::definitions::WorkflowKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workflow {0} is already active for this conversation")]
    WorkflowActive(WorkflowKind),

    #[error("no workflow is active for this conversation")]
    NoActiveWorkflow,

    #[error("workflow {0} is already complete")]
    AlreadyComplete(WorkflowKind),

    #[error("step cannot move back from {from} to {to}")]
    StepRegression {
        from: &'static str,
        to: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    pub context: Context,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub last_active: DateTime<Utc>,
}

impl Conversation {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            context: Context::default(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>, workflow: Option<WorkflowKind>) {
        let timestamp = Utc::now();
        self.messages.push(Message {
            role,
            content: content.into(),
            workflow,
            timestamp,
        });
        self.last_active = timestamp;
    }

    pub fn update(&mut self, update: ContextUpdate) -> Result<&Context, StoreError> {
        self.context.apply(update)?;
        self.last_active = Utc::now();
        Ok(&self.context)
    }

    /// The trailing `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

type Slot = Arc<Mutex<Conversation>>;

#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<String, Slot>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `id` when given (creating the entry if unknown), otherwise a fresh UUID.
    pub async fn get_or_create(&self, id: Option<&str>) -> String {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        self.slot(&id).await;
        id
    }

    /// Locks one conversation for a read-modify-write cycle, creating it if unknown.
    pub async fn lock(&self, id: &str) -> OwnedMutexGuard<Conversation> {
        self.slot(id).await.lock_owned().await
    }

    pub async fn conversation(&self, id: &str) -> Option<Conversation> {
        let slot = self.existing(id).await?;
        let conversation = slot.lock().await.clone();
        Some(conversation)
    }

    /// Copies of every conversation, ordered by creation time.
    pub async fn snapshot(&self) -> Vec<Conversation> {
        let slots: Vec<Slot> = self.inner.read().await.values().cloned().collect();
        let mut conversations = Vec::with_capacity(slots.len());
        for slot in slots {
            conversations.push(slot.lock().await.clone());
        }
        conversations.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        conversations
    }

    /// Drops every conversation and returns how many there were.
    pub async fn clear(&self) -> usize {
        let mut map = self.inner.write().await;
        let cleared = map.len();
        map.clear();
        cleared
    }

    /// Drops conversations idle for longer than `ttl` as of `now`.
    /// Conversations locked by an in-flight turn are kept.
    pub async fn evict_idle(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl)
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, slot| match slot.try_lock() {
            Ok(conversation) => now.signed_duration_since(conversation.last_active) <= ttl,
            Err(_) => true,
        });
        before - map.len()
    }

    /// Spawns a background task that periodically evicts idle conversations.
    pub fn spawn_sweeper(&self, ttl: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = ttl.min(Duration::from_secs(300));
        info!("Conversation sweeper enabled: ttl={}s", ttl.as_secs());
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(Utc::now(), ttl).await;
                if evicted > 0 {
                    debug!("Evicted {evicted} idle conversations");
                }
            }
        })
    }

    async fn existing(&self, id: &str) -> Option<Slot> {
        self.inner.read().await.get(id).cloned()
    }

    async fn slot(&self, id: &str) -> Slot {
        if let Some(slot) = self.existing(id).await {
            return slot;
        }
        let mut map = self.inner.write().await;
        map.entry(id.to_string())
            .or_insert_with(|| {
                debug!("Creating conversation {id}");
                Arc::new(Mutex::new(Conversation::new(id.to_string())))
            })
            .clone()
    }
}

/// Per-id accessors outside a turn. The engine works on a locked
/// `Conversation` directly; these serve tests and operational tooling.
#[cfg_attr(not(test), allow(dead_code))]
impl ConversationStore {
    /// Appends a message. Unknown ids are created first.
    pub async fn append_message(
        &self,
        id: &str,
        role: Role,
        content: impl Into<String>,
        workflow: Option<WorkflowKind>,
    ) {
        self.lock(id).await.push(role, content, workflow);
    }

    /// Messages in insertion order; empty for unknown ids.
    pub async fn messages(&self, id: &str) -> Vec<Message> {
        match self.existing(id).await {
            Some(slot) => slot.lock().await.messages.clone(),
            None => Vec::new(),
        }
    }

    /// The conversation's context, or the default context for unknown ids.
    pub async fn context(&self, id: &str) -> Context {
        match self.existing(id).await {
            Some(slot) => slot.lock().await.context.clone(),
            None => Context::default(),
        }
    }

    /// Shallow-merges `update` into the context and returns the merged result.
    pub async fn update_context(
        &self,
        id: &str,
        update: ContextUpdate,
    ) -> Result<Context, StoreError> {
        let mut conversation = self.lock(id).await;
        conversation.update(update).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
