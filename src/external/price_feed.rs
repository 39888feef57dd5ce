use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Trailing history window supported by the feed. The engine needs a
/// five-year window for return statistics and a short window for the
/// risk-free rate proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    FiveYears,
    OneMonth,
}

impl HistoryWindow {
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoryWindow::FiveYears => "5y",
            HistoryWindow::OneMonth => "1mo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("ticker not found")]
    NotFound,
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Daily adjusted-close history over the trailing window, ascending by
    /// date, with missing closes skipped.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, PriceFeedError>;

    /// Most recent observation within the window.
    async fn fetch_latest(
        &self,
        ticker: &str,
        window: HistoryWindow,
    ) -> Result<f64, PriceFeedError> {
        let points = self.fetch_daily_history(ticker, window).await?;
        points
            .last()
            .map(|p| p.close)
            .ok_or(PriceFeedError::NotFound)
    }
}
