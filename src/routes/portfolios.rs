use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::TaggedPrediction;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_portfolios))
        .route("/:name/predictions", get(portfolio_predictions))
}

/// GET /api/portfolios
///
/// Distinct portfolio names for the configured user, for the selector.
#[axum::debug_handler]
pub async fn list_portfolios(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /api/portfolios - Listing portfolio names");

    let table = state.fetcher.table().await;
    let names = table.portfolio_names();
    if names.is_empty() {
        return Err(AppError::NoData);
    }

    Ok(Json(names))
}

/// GET /api/portfolios/:name/predictions
///
/// The tagged prediction rows for one portfolio, for display. An unknown
/// name yields an empty list, matching the filter semantics of the table.
#[axum::debug_handler]
pub async fn portfolio_predictions(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<TaggedPrediction>>, AppError> {
    info!("GET /api/portfolios/{}/predictions", name);

    let table = state.fetcher.table().await;
    Ok(Json(table.filter_by_name(&name).into_rows()))
}
