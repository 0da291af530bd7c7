// Scripted document workflows and the chat engine that drives them.
// All LLM calls go through llm_client::ChatModel, never direct provider calls here.

pub mod definitions;
pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod triggers;
