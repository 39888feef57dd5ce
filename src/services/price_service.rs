use crate::errors::AppError;
use crate::external::price_feed::{HistoryWindow, PriceFeed, PriceFeedError};
use crate::table::Table;
use futures::future;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// ACWI (All Country World Index) tracks global equity exposure and serves
/// as the market proxy for CAPM.
pub const MARKET_TICKER: &str = "ACWI";

/// Canonical column name the benchmark series is renamed to.
pub const MARKET_COLUMN: &str = "Market";

/// Fetch a dense five-year daily price table for the requested tickers plus
/// the market benchmark.
///
/// Tickers the feed cannot resolve (and tickers with no bars at all) are
/// dropped and reported in the returned not-found set. Rows are aligned on
/// the intersection of the remaining columns' trading days, so a ticker
/// with short history thins the whole table rather than being flagged.
pub async fn fetch_price_table(
    feed: &dyn PriceFeed,
    tickers: &BTreeSet<String>,
) -> Result<(Table, BTreeSet<String>), AppError> {
    // The benchmark ticker and its canonical column name are reserved: a
    // holding may not alias the market column, so neither is fetched as an
    // asset (both are reported unresolved below).
    let mut requested: Vec<String> = tickers
        .iter()
        .filter(|t| *t != MARKET_TICKER && *t != MARKET_COLUMN)
        .cloned()
        .collect();
    requested.push(MARKET_TICKER.to_string());

    let fetches = requested
        .iter()
        .map(|ticker| feed.fetch_daily_history(ticker, HistoryWindow::FiveYears));
    let results = future::join_all(fetches).await;

    let mut series = Vec::new();
    for (ticker, result) in requested.iter().zip(results) {
        match result {
            Ok(points) if !points.is_empty() => {
                debug!("Resolved {} with {} daily closes", ticker, points.len());
                series.push((
                    ticker.clone(),
                    points.into_iter().map(|p| (p.date, p.close)).collect(),
                ));
            }
            Ok(_) => {
                warn!("Ticker {} resolved but returned no history", ticker);
            }
            Err(PriceFeedError::NotFound) => {
                warn!("Ticker {} not found by price feed", ticker);
            }
            Err(PriceFeedError::RateLimited) => return Err(AppError::RateLimited),
            Err(e) => {
                return Err(AppError::DataUnavailable(format!(
                    "price feed failed for {ticker}: {e}"
                )))
            }
        }
    }

    let mut table = Table::from_series(series);

    if !table.has_column(MARKET_TICKER) {
        return Err(AppError::DataUnavailable(format!(
            "market benchmark {MARKET_TICKER} could not be resolved"
        )));
    }

    // Resolution is judged before the benchmark rename, so a requested
    // ticker named like the canonical market column never counts as
    // resolved by aliasing into it.
    let not_found: BTreeSet<String> = tickers
        .iter()
        .filter(|t| *t == MARKET_TICKER || *t == MARKET_COLUMN || !table.has_column(t))
        .cloned()
        .collect();

    table.rename_column(MARKET_TICKER, MARKET_COLUMN);

    if table.width() < 2 {
        return Err(AppError::DataUnavailable(
            "none of the requested tickers could be resolved".to_string(),
        ));
    }

    Ok((table, not_found))
}
