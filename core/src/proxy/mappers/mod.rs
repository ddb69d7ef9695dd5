// Mappers module
pub mod deepl;
pub mod openrouter;
