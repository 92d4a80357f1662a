mod app;
mod config;
mod errors;
mod external;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::external::portfolio_api::HttpPredictionSource;
use crate::services::chat_service::SessionStore;
use crate::services::fetcher::PredictionFetcher;
use crate::services::llm_service::{GroqProvider, LlmConfig, LlmProvider};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "📊 Upstream portfolio API: {} (user {})",
        config.base_url,
        config.user_id
    );

    let source = Arc::new(HttpPredictionSource::new(
        config.base_url.clone(),
        config.fetch_timeout,
    )?);
    let fetcher = Arc::new(PredictionFetcher::new(
        source,
        config.user_id,
        config.cache_ttl,
    ));
    let llm: Arc<dyn LlmProvider> =
        Arc::new(GroqProvider::new(LlmConfig::new(config.groq_api_key.clone())));

    let state = AppState {
        fetcher,
        llm,
        sessions: SessionStore::new(),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 PacRobo portfolio chat running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
