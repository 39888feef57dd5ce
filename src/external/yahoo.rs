use crate::external::price_feed::{HistoryWindow, PriceFeed, PriceFeedError, PricePoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct YahooFeed {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFeed {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for YahooFeed {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    #[allow(dead_code)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    adjclose: Vec<Option<f64>>,
}

#[async_trait]
impl PriceFeed for YahooFeed {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, PriceFeedError> {
        let url = format!(
            "{}/v8/finance/chart/{ticker}?range={}&interval=1d",
            self.base_url,
            window.as_range()
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PriceFeedError::Network(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(PriceFeedError::RateLimited),
            reqwest::StatusCode::NOT_FOUND => return Err(PriceFeedError::NotFound),
            status if !status.is_success() => {
                return Err(PriceFeedError::BadResponse(format!(
                    "status {status} for {ticker}"
                )))
            }
            _ => {}
        }

        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| PriceFeedError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or(PriceFeedError::NotFound)?;

        let Some(timestamps) = result.timestamp else {
            // Symbol exists but has no bars in the window
            return Ok(Vec::new());
        };

        // Prefer the dividend/split adjusted series; fall back to raw close
        let closes = match result.indicators.adjclose.and_then(|mut a| a.pop()) {
            Some(adj) => adj.adjclose,
            None => result
                .indicators
                .quote
                .into_iter()
                .next()
                .ok_or_else(|| PriceFeedError::BadResponse("missing quote".into()))?
                .close,
        };

        let mut out = Vec::new();
        for (i, ts) in timestamps.iter().enumerate() {
            let Some(close) = closes.get(i).and_then(|v| *v) else {
                continue;
            };

            let date = chrono::DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| PriceFeedError::Parse("bad timestamp".into()))?
                .date_naive();

            out.push(PricePoint { date, close });
        }

        out.sort_by_key(|p| p.date);

        Ok(out)
    }
}
