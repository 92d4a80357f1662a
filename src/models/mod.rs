mod chat;
mod portfolio;

pub use chat::{AskRequest, ChatMessage, ChatSession, ChatTurn, Role, SessionCreated};
pub use portfolio::{Portfolio, PortfolioTable, PredictionRow, TaggedPrediction};
