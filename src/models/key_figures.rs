use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

/// Row name of the synthesized portfolio-level aggregate.
pub const PORTFOLIO_ROW: &str = "Portfolio";

/// Per-asset (or portfolio-level) risk/return figures.
///
/// `historical_return` and `expected_return` are annualized decimal
/// fractions; `historical_volatility` is the one-month statistic
/// (daily sample std scaled by sqrt(21)), intentionally not annualized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeyFigureRow {
    pub ticker: String,
    pub historical_return: f64,
    pub historical_volatility: f64,
    pub beta: f64,
    pub expected_return: f64,
    pub risk_free_rate: f64,
    pub weight: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFiguresResponse {
    pub key_figures: Vec<KeyFigureRow>,
    pub not_found: BTreeSet<String>,
}
