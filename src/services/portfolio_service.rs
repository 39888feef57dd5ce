use crate::db;
use crate::errors::AppError;
use crate::external::price_feed::PriceFeed;
use crate::models::{Contribution, KeyFigureRow};
use crate::services::analytics_service;
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

/// Compute key figures for the contribution and persist them under
/// `(session_id, portfolio_id)`. Returns the tickers that could not be
/// resolved (the stored rows cover the retained subset).
pub async fn save(
    pool: &PgPool,
    feed: &dyn PriceFeed,
    contribution: &Contribution,
    portfolio_id: &str,
    session_id: Uuid,
) -> Result<BTreeSet<String>, AppError> {
    if portfolio_id.trim().is_empty() {
        return Err(AppError::Validation(
            "portfolio name must not be empty".to_string(),
        ));
    }
    if db::portfolio_queries::exists(pool, session_id, portfolio_id).await? {
        return Err(AppError::Validation(format!(
            "portfolio {portfolio_id} already exists"
        )));
    }

    let (rows, not_found) = analytics_service::compute_key_figures(feed, contribution).await?;
    db::portfolio_queries::insert_rows(pool, session_id, portfolio_id, &rows).await?;

    info!(
        "Saved portfolio {} ({} rows) for session {}",
        portfolio_id,
        rows.len(),
        session_id
    );

    Ok(not_found)
}

pub async fn fetch(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
) -> Result<Vec<KeyFigureRow>, AppError> {
    let rows = db::portfolio_queries::fetch_rows(pool, session_id, portfolio_id).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(rows)
}

pub async fn list_names(pool: &PgPool, session_id: Uuid) -> Result<Vec<String>, AppError> {
    Ok(db::portfolio_queries::list_names(pool, session_id).await?)
}

pub async fn remove(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
) -> Result<(), AppError> {
    match db::portfolio_queries::delete_portfolio(pool, session_id, portfolio_id).await? {
        0 => Err(AppError::NotFound),
        _ => Ok(()),
    }
}

pub async fn remove_all(pool: &PgPool, session_id: Uuid) -> Result<u64, AppError> {
    Ok(db::portfolio_queries::delete_session(pool, session_id).await?)
}
