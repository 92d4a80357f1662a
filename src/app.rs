use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{chat, health, portfolios};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/portfolios", portfolios::router())
        .nest("/api/chat", chat::router())
        // The dashboard frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
