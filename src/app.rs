use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{analytics, health, portfolios};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/analytics", analytics::router())
        .nest("/api/portfolios", portfolios::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
