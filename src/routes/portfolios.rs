use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{KeyFigureRow, SavePortfolio, SavePortfolioResponse};
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_portfolio))
        .route("/:session_id", get(list_portfolios))
        .route("/:session_id", delete(remove_all_portfolios))
        .route("/:session_id/:portfolio_id", get(get_portfolio))
        .route("/:session_id/:portfolio_id", delete(remove_portfolio))
}

#[axum::debug_handler]
async fn save_portfolio(
    State(state): State<AppState>,
    Json(data): Json<SavePortfolio>,
) -> Result<Json<SavePortfolioResponse>, AppError> {
    info!("POST /portfolios - Saving portfolio {}", data.portfolio_id);
    let not_found = portfolio_service::save(
        &state.pool,
        state.price_feed.as_ref(),
        &data.contribution,
        &data.portfolio_id,
        data.session_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to save portfolio {}: {}", data.portfolio_id, e);
        e
    })?;
    Ok(Json(SavePortfolioResponse { not_found }))
}

async fn list_portfolios(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /portfolios/{} - Listing portfolio names", session_id);
    let names = portfolio_service::list_names(&state.pool, session_id)
        .await
        .map_err(|e| {
            error!("Failed to list portfolios for session {}: {}", session_id, e);
            e
        })?;
    Ok(Json(names))
}

async fn get_portfolio(
    State(state): State<AppState>,
    Path((session_id, portfolio_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<KeyFigureRow>>, AppError> {
    info!(
        "GET /portfolios/{}/{} - Fetching stored key figures",
        session_id, portfolio_id
    );
    let rows = portfolio_service::fetch(&state.pool, session_id, &portfolio_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(rows))
}

async fn remove_portfolio(
    State(state): State<AppState>,
    Path((session_id, portfolio_id)): Path<(Uuid, String)>,
) -> Result<Json<()>, AppError> {
    info!(
        "DELETE /portfolios/{}/{} - Removing portfolio",
        session_id, portfolio_id
    );
    portfolio_service::remove(&state.pool, session_id, &portfolio_id)
        .await
        .map_err(|e| {
            error!("Failed to remove portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(()))
}

async fn remove_all_portfolios(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<u64>, AppError> {
    info!(
        "DELETE /portfolios/{} - Removing all session portfolios",
        session_id
    );
    let removed = portfolio_service::remove_all(&state.pool, session_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to remove portfolios for session {}: {}",
                session_id, e
            );
            e
        })?;
    Ok(Json(removed))
}
