use portfolio_builder_backend::app;
use portfolio_builder_backend::external::mock::MockFeed;
use portfolio_builder_backend::external::price_feed::PriceFeed;
use portfolio_builder_backend::external::yahoo::YahooFeed;
use portfolio_builder_backend::logging::{init_logging, LoggingConfig};
use portfolio_builder_backend::state::AppState;

use anyhow::bail;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    // Select price feed via PRICE_FEED (defaults to yahoo)
    let feed_name = std::env::var("PRICE_FEED").unwrap_or_else(|_| "yahoo".to_string());
    let price_feed: Arc<dyn PriceFeed> = match feed_name.to_lowercase().as_str() {
        "yahoo" => {
            tracing::info!("Using price feed: Yahoo Finance");
            Arc::new(YahooFeed::new())
        }
        "mock" => {
            tracing::info!("Using price feed: seeded mock walks (offline)");
            Arc::new(MockFeed::new())
        }
        other => {
            bail!("Invalid PRICE_FEED: {other}. Must be 'yahoo' or 'mock'");
        }
    };

    let state = AppState { pool, price_feed };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Portfolio builder backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
