use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ChatMessage, ChatSession, ChatTurn, Role};
use crate::services::fetcher::PredictionFetcher;
use crate::services::llm_service::LlmProvider;
use crate::services::prompt;

/// Shown to the user when the completion call fails; the turn still completes
/// and the session stays usable.
pub const FALLBACK_REPLY: &str =
    "Sorry, I wasn't able to answer that just now. Please try again in a moment.";

/// In-memory store of chat sessions, each owning an ordered, append-only
/// message log. Sessions live for the process lifetime only.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Uuid {
        let session = ChatSession::new();
        let id = session.id;
        self.sessions.insert(id, session);
        info!("Created chat session {}", id);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<ChatSession> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    /// Appends a message and returns the new log length; `None` for an
    /// unknown session.
    pub fn append(&self, id: &Uuid, role: Role, content: String) -> Option<usize> {
        self.sessions.get_mut(id).map(|mut session| {
            session.messages.push(ChatMessage { role, content });
            session.messages.len()
        })
    }
}

/// Drives one request/response cycle: append the user message, rebuild the
/// portfolio context, call the LLM, append the reply. The log grows by
/// exactly two entries per turn whether or not the completion succeeds.
/// Prior messages are kept for display but never resent to the model.
pub async fn run_turn(
    sessions: &SessionStore,
    fetcher: &PredictionFetcher,
    llm: Arc<dyn LlmProvider>,
    session_id: Uuid,
    portfolio_name: &str,
    question: &str,
) -> Result<ChatTurn, AppError> {
    info!(
        "Chat turn for session {} (portfolio: {})",
        session_id, portfolio_name
    );

    sessions
        .append(&session_id, Role::User, question.to_string())
        .ok_or(AppError::NotFound)?;

    let table = fetcher.table().await;
    let filtered = table.filter_by_name(portfolio_name);
    if filtered.is_empty() {
        // Still a valid turn: the prompt just carries no rows.
        warn!("No prediction rows for portfolio '{}'", portfolio_name);
    }

    let prompt = prompt::build_prompt(&filtered, portfolio_name, question);

    let reply = match llm.generate_completion(prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!("LLM completion failed: {}", e);
            FALLBACK_REPLY.to_string()
        }
    };

    let message_count = sessions
        .append(&session_id, Role::Assistant, reply.clone())
        .ok_or(AppError::NotFound)?;

    Ok(ChatTurn {
        reply,
        message_count,
    })
}
