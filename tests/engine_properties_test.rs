//! Property tests for the analytics engine exercised through the library
//! surface, with a fixture price feed in place of the network.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use portfolio_builder_backend::errors::AppError;
use portfolio_builder_backend::external::price_feed::{
    HistoryWindow, PriceFeed, PriceFeedError, PricePoint,
};
use portfolio_builder_backend::models::{Contribution, KeyFigureRow, PORTFOLIO_ROW};
use portfolio_builder_backend::services::analytics_service::{
    compute_key_figures, RISK_FREE_PROXY,
};
use portfolio_builder_backend::services::price_service::MARKET_TICKER;
use portfolio_builder_backend::services::projection_service::project_prices;

const TOL: f64 = 1e-9;

struct FixtureFeed {
    series: HashMap<String, Vec<f64>>,
}

impl FixtureFeed {
    fn new() -> Self {
        let mut series = HashMap::new();
        series.insert(
            MARKET_TICKER.to_string(),
            vec![100.0, 101.5, 100.8, 102.3, 103.1, 101.9, 104.0, 103.2],
        );
        series.insert(RISK_FREE_PROXY.to_string(), vec![5.0, 5.1, 5.2]);
        Self { series }
    }

    fn with_series(mut self, ticker: &str, closes: &[f64]) -> Self {
        self.series.insert(ticker.to_string(), closes.to_vec());
        self
    }
}

#[async_trait]
impl PriceFeed for FixtureFeed {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        _window: HistoryWindow,
    ) -> Result<Vec<PricePoint>, PriceFeedError> {
        let closes = self.series.get(ticker).ok_or(PriceFeedError::NotFound)?;
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        Ok(closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close: *close,
            })
            .collect())
    }
}

fn contribution(entries: &[(&str, f64)]) -> Contribution {
    entries.iter().map(|(t, a)| (t.to_string(), *a)).collect()
}

fn asset_rows(rows: &[KeyFigureRow]) -> Vec<&KeyFigureRow> {
    rows.iter().filter(|r| r.ticker != PORTFOLIO_ROW).collect()
}

#[tokio::test]
async fn weights_sum_to_one_for_multi_asset_contributions() {
    let feed = FixtureFeed::new()
        .with_series("AAA", &[40.0, 41.2, 40.5, 42.0, 41.8, 43.0, 42.5, 44.1])
        .with_series("BBB", &[10.0, 9.8, 10.3, 10.1, 10.6, 10.4, 10.9, 11.2])
        .with_series("CCC", &[75.0, 76.1, 74.8, 77.0, 78.2, 76.9, 79.0, 80.1]);

    let (rows, not_found) = compute_key_figures(
        &feed,
        &contribution(&[("AAA", 120.0), ("BBB", 380.0), ("CCC", 500.0)]),
    )
    .await
    .unwrap();

    assert!(not_found.is_empty());
    let sum: f64 = asset_rows(&rows).iter().map(|r| r.weight).sum();
    assert!((sum - 1.0).abs() < TOL);
}

#[tokio::test]
async fn portfolio_return_equals_weight_dot_product() {
    let feed = FixtureFeed::new()
        .with_series("AAA", &[40.0, 41.2, 40.5, 42.0, 41.8, 43.0, 42.5, 44.1])
        .with_series("BBB", &[10.0, 9.8, 10.3, 10.1, 10.6, 10.4, 10.9, 11.2]);

    let (rows, _) = compute_key_figures(&feed, &contribution(&[("AAA", 300.0), ("BBB", 700.0)]))
        .await
        .unwrap();

    let assets = asset_rows(&rows);
    let dot: f64 = assets.iter().map(|r| r.weight * r.historical_return).sum();
    let portfolio = rows.last().unwrap();

    assert_eq!(portfolio.ticker, PORTFOLIO_ROW);
    assert!((portfolio.historical_return - dot).abs() < TOL);
}

#[tokio::test]
async fn identical_series_give_equal_betas_and_half_weights() {
    let series = [40.0, 41.2, 40.5, 42.0, 41.8, 43.0, 42.5, 44.1];
    let feed = FixtureFeed::new()
        .with_series("A", &series)
        .with_series("B", &series);

    let (rows, _) = compute_key_figures(&feed, &contribution(&[("A", 100.0), ("B", 100.0)]))
        .await
        .unwrap();

    let assets = asset_rows(&rows);
    assert_eq!(assets.len(), 2);
    assert!((assets[0].beta - assets[1].beta).abs() < TOL);
    assert!((assets[0].weight - 0.5).abs() < TOL);
    assert!((assets[1].weight - 0.5).abs() < TOL);
}

#[tokio::test]
async fn single_asset_portfolio_volatility_matches_the_asset() {
    let feed =
        FixtureFeed::new().with_series("AAA", &[40.0, 41.2, 40.5, 42.0, 41.8, 43.0, 42.5, 44.1]);

    let (rows, _) = compute_key_figures(&feed, &contribution(&[("AAA", 250.0)]))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    let portfolio = rows.last().unwrap();
    assert!(portfolio.historical_volatility >= 0.0);
    assert!((portfolio.historical_volatility - rows[0].historical_volatility).abs() < TOL);
}

#[tokio::test]
async fn unresolved_ticker_is_reported_and_weight_renormalized() {
    let feed =
        FixtureFeed::new().with_series("GOOD", &[40.0, 41.2, 40.5, 42.0, 41.8, 43.0, 42.5, 44.1]);

    let (rows, not_found) = compute_key_figures(
        &feed,
        &contribution(&[("GOOD", 100.0), ("BAD_TICKER", 50.0)]),
    )
    .await
    .unwrap();

    assert_eq!(not_found, ["BAD_TICKER".to_string()].into_iter().collect());
    assert!(rows.iter().all(|r| r.ticker != "BAD_TICKER"));
    let assets = asset_rows(&rows);
    assert_eq!(assets.len(), 1);
    assert!((assets[0].weight - 1.0).abs() < TOL);
}

#[tokio::test]
async fn empty_contribution_fails_fast() {
    let feed = FixtureFeed::new();

    let err = compute_key_figures(&feed, &contribution(&[]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidContribution(_)));
}

#[test]
fn projection_example_is_positive_ordered_and_sized() {
    let path = project_prices(10.0, 0.08, 0.2, 10.0, 1.96).unwrap();

    assert_eq!(path.len(), 3652);
    for t in 0..path.len() {
        assert!(path.lower[t] > 0.0);
        assert!(path.lower[t] <= path.expected[t]);
        assert!(path.expected[t] <= path.upper[t]);
    }
}

#[test]
fn projection_lengths_for_one_ten_thirty_years() {
    for (years, expected_len) in [(1.0, 365), (10.0, 3652), (30.0, 10957)] {
        let path = project_prices(100.0, 0.05, 0.15, years, 1.645).unwrap();
        assert_eq!(path.len(), expected_len);
    }
}

#[test]
fn zero_volatility_projection_collapses_to_the_drift_curve() {
    let path = project_prices(10.0, 0.08, 0.0, 1.0, 1.96).unwrap();

    for t in 0..path.len() {
        assert_eq!(path.expected[t], path.lower[t]);
        assert_eq!(path.expected[t], path.upper[t]);
    }
}
