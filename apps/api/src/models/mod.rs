pub mod plan;
pub mod template;
pub mod upload;
pub mod user;
