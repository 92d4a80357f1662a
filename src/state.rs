use std::sync::Arc;

use crate::services::chat_service::SessionStore;
use crate::services::fetcher::PredictionFetcher;
use crate::services::llm_service::LlmProvider;

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<PredictionFetcher>,
    pub llm: Arc<dyn LlmProvider>,
    pub sessions: SessionStore,
}
