// Document uploads: text extraction, storage and the chat file-context feed.

pub mod context;
pub mod extract;
pub mod handlers;
