//! Concrete proxy endpoints

pub mod chat;
pub mod translate;
pub mod usage;

pub use chat::{ChatHandler, ChatReply, ChatRequest};
pub use translate::{TranslateHandler, TranslateReply, TranslateRequest};
pub use usage::UsageHandler;
