use crate::external::price_feed::{HistoryWindow, PriceFeed, PriceFeedError, PricePoint};
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Offline feed for local development: a seeded random walk per ticker, so
/// the same symbol always yields the same series within a process run.
/// The risk-free proxy resolves to a flat short-rate quote (in percent,
/// like the real 13-week T-bill index).
pub struct MockFeed {
    short_rate_quote: f64,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            short_rate_quote: 4.5,
        }
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn ticker_seed(ticker: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    ticker.hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
impl PriceFeed for MockFeed {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, PriceFeedError> {
        let calendar_days = match window {
            HistoryWindow::FiveYears => 5 * 365,
            HistoryWindow::OneMonth => 30,
        };

        let today = Utc::now().date_naive();
        let mut rng = StdRng::seed_from_u64(ticker_seed(ticker));
        let mut current = 50.0 + rng.random::<f64>() * 200.0;

        let mut points = Vec::new();
        for i in (0..calendar_days).rev() {
            let date = today - ChronoDuration::days(i);
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            if ticker == crate::services::analytics_service::RISK_FREE_PROXY {
                points.push(PricePoint {
                    date,
                    close: self.short_rate_quote,
                });
            } else {
                current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.02;
                points.push(PricePoint {
                    date,
                    close: current,
                });
            }
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_ticker_yields_same_series() {
        let feed = MockFeed::new();
        let a = feed
            .fetch_daily_history("AAPL", HistoryWindow::FiveYears)
            .await
            .unwrap();
        let b = feed
            .fetch_daily_history("AAPL", HistoryWindow::FiveYears)
            .await
            .unwrap();

        assert_eq!(a, b);
        assert!(a.len() > 1000);
        assert!(a.iter().all(|p| p.close > 0.0));
    }

    #[tokio::test]
    async fn test_short_rate_proxy_is_flat_quote() {
        let feed = MockFeed::new();
        let quote = feed
            .fetch_latest(
                crate::services::analytics_service::RISK_FREE_PROXY,
                HistoryWindow::OneMonth,
            )
            .await
            .unwrap();

        assert_eq!(quote, 4.5);
    }
}
