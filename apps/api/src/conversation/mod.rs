// In-memory conversation logs and per-conversation workflow context.

pub mod models;
pub mod store;
