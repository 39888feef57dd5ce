use crate::external::price_feed::PriceFeed;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub price_feed: Arc<dyn PriceFeed>,
}
