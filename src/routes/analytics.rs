use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Contribution, KeyFiguresResponse, ProjectionPath};
use crate::services::{analytics_service, projection_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/key-figures", post(compute_key_figures))
        .route("/projection", get(get_projection))
}

#[derive(Debug, Deserialize)]
struct KeyFiguresRequest {
    contribution: Contribution,
}

#[axum::debug_handler]
async fn compute_key_figures(
    State(state): State<AppState>,
    Json(req): Json<KeyFiguresRequest>,
) -> Result<Json<KeyFiguresResponse>, AppError> {
    info!("POST /analytics/key-figures - Computing key figures");
    let (key_figures, not_found) =
        analytics_service::compute_key_figures(state.price_feed.as_ref(), &req.contribution)
            .await
            .map_err(|e| {
                error!("Failed to compute key figures: {}", e);
                e
            })?;
    Ok(Json(KeyFiguresResponse {
        key_figures,
        not_found,
    }))
}

#[derive(Debug, Deserialize)]
struct ProjectionQuery {
    current_price: f64,
    /// Annual drift as a decimal fraction (0.08 for 8%)
    expected_return: f64,
    /// GBM sigma as a decimal fraction
    volatility: f64,
    years: f64,
    /// Normal quantile for the confidence band (1.96 for 95%)
    z: f64,
}

async fn get_projection(
    Query(params): Query<ProjectionQuery>,
) -> Result<Json<ProjectionPath>, AppError> {
    info!(
        "GET /analytics/projection - {} years, z = {}",
        params.years, params.z
    );
    let path = projection_service::project_prices(
        params.current_price,
        params.expected_return,
        params.volatility,
        params.years,
        params.z,
    )?;
    Ok(Json(path))
}
