pub mod chat_service;
pub mod fetcher;
pub mod llm_service;
pub mod prompt;
pub mod table_cache;
