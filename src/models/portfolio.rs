use crate::models::Contribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct SavePortfolio {
    pub session_id: Uuid,
    pub portfolio_id: String,
    pub contribution: Contribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavePortfolioResponse {
    pub not_found: BTreeSet<String>,
}
