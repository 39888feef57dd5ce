use crate::errors::AppError;
use crate::external::price_feed::{HistoryWindow, PriceFeed, PriceFeedError};
use crate::models::{Contribution, KeyFigureRow, PORTFOLIO_ROW};
use crate::services::price_service::{self, MARKET_COLUMN};
use crate::table::Table;
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::BTreeSet;
use tracing::info;

/// 13-week US T-bill yield index, the risk-free rate proxy. Quoted in
/// percent (5.2 means 5.2%).
pub const RISK_FREE_PROXY: &str = "^IRX";

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const TRADING_DAYS_PER_MONTH: f64 = 21.0;

/// Compute per-asset and portfolio-level key figures under CAPM for a
/// contribution mapping.
///
/// Tickers the feed cannot resolve are excluded and reported in the
/// returned set; weights are renormalized over the retained tickers. The
/// final row is the synthesized portfolio aggregate: return, beta and
/// expected return are weight-dot-products, volatility comes from the full
/// covariance matrix of daily returns (`sqrt(w' Σ w) * sqrt(21)`).
pub async fn compute_key_figures(
    feed: &dyn PriceFeed,
    contribution: &Contribution,
) -> Result<(Vec<KeyFigureRow>, BTreeSet<String>), AppError> {
    if contribution.is_empty() {
        return Err(AppError::InvalidContribution(
            "contribution is empty".to_string(),
        ));
    }
    for (ticker, amount) in contribution.iter() {
        if !amount.is_finite() || *amount <= 0.0 {
            return Err(AppError::InvalidContribution(format!(
                "amount for {ticker} must be a positive number"
            )));
        }
    }

    let (prices, not_found) =
        price_service::fetch_price_table(feed, &contribution.tickers()).await?;

    let returns = prices.daily_returns();
    if returns.height() < 2 {
        return Err(AppError::DataUnavailable(
            "insufficient overlapping price history".to_string(),
        ));
    }

    let risk_free_rate = fetch_risk_free_rate(feed).await?;

    let market = returns
        .column(MARKET_COLUMN)
        .expect("price table always carries the market column");
    let market_var = sample_var(market);
    let market_annual_return = annualize(mean(market));

    let retained: Vec<(&String, f64)> = contribution
        .iter()
        .filter(|(ticker, _)| !not_found.contains(*ticker))
        .map(|(ticker, amount)| (ticker, *amount))
        .collect();
    if retained.is_empty() {
        return Err(AppError::InvalidContribution(
            "no contributed ticker could be resolved".to_string(),
        ));
    }
    let total: f64 = retained.iter().map(|(_, amount)| amount).sum();

    let mut rows = Vec::with_capacity(retained.len() + 1);
    for (ticker, amount) in &retained {
        let asset = returns
            .column(ticker)
            .expect("retained tickers are columns of the price table");

        let historical_return = annualize(mean(asset));
        let historical_volatility = sample_std(asset) * TRADING_DAYS_PER_MONTH.sqrt();
        // Correlation-matrix route:
        // corr(asset, market) * var(asset) / var(market)
        let beta = pearson(asset, market) * sample_var(asset) / market_var;
        let expected_return = risk_free_rate + beta * (market_annual_return - risk_free_rate);

        rows.push(KeyFigureRow {
            ticker: (*ticker).clone(),
            historical_return,
            historical_volatility,
            beta,
            expected_return,
            risk_free_rate,
            weight: amount / total,
            amount: *amount,
        });
    }

    rows.push(portfolio_row(&rows, &returns, risk_free_rate, total));

    info!(
        "Computed key figures for {} assets ({} unresolved)",
        rows.len() - 1,
        not_found.len()
    );

    Ok((rows, not_found))
}

async fn fetch_risk_free_rate(feed: &dyn PriceFeed) -> Result<f64, AppError> {
    let quote = feed
        .fetch_latest(RISK_FREE_PROXY, HistoryWindow::OneMonth)
        .await
        .map_err(|e| match e {
            PriceFeedError::RateLimited => AppError::RateLimited,
            other => AppError::DataUnavailable(format!(
                "risk-free proxy {RISK_FREE_PROXY} unavailable: {other}"
            )),
        })?;
    // The proxy quotes in percent
    Ok(quote / 100.0)
}

/// Aggregate the per-asset rows into the portfolio row. Volatility is a
/// genuine portfolio-variance computation over the asset covariance matrix,
/// not a weighted average of individual volatilities.
fn portfolio_row(
    assets: &[KeyFigureRow],
    returns: &Table,
    risk_free_rate: f64,
    total: f64,
) -> KeyFigureRow {
    let historical_return = assets
        .iter()
        .map(|row| row.weight * row.historical_return)
        .sum();
    let beta: f64 = assets.iter().map(|row| row.weight * row.beta).sum();
    let expected_return = assets
        .iter()
        .map(|row| row.weight * row.expected_return)
        .sum();

    let k = assets.len();
    let mut sigma = Array2::zeros((k, k));
    for (i, a) in assets.iter().enumerate() {
        let col_i = returns
            .column(&a.ticker)
            .expect("asset rows correspond to return columns");
        for (j, b) in assets.iter().enumerate() {
            let col_j = returns
                .column(&b.ticker)
                .expect("asset rows correspond to return columns");
            sigma[(i, j)] = sample_cov(col_i, col_j);
        }
    }
    let weights = Array1::from_iter(assets.iter().map(|row| row.weight));
    let portfolio_var = weights.dot(&sigma.dot(&weights));
    let historical_volatility = portfolio_var.sqrt() * TRADING_DAYS_PER_MONTH.sqrt();

    KeyFigureRow {
        ticker: PORTFOLIO_ROW.to_string(),
        historical_return,
        historical_volatility,
        beta,
        expected_return,
        risk_free_rate,
        weight: 1.0,
        amount: total,
    }
}

fn annualize(mean_daily_return: f64) -> f64 {
    (1.0 + mean_daily_return).powf(TRADING_DAYS_PER_YEAR) - 1.0
}

fn mean(v: ArrayView1<'_, f64>) -> f64 {
    v.sum() / v.len() as f64
}

// Sample statistics (n - 1 denominators) throughout.
fn sample_var(v: ArrayView1<'_, f64>) -> f64 {
    let m = mean(v);
    v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (v.len() as f64 - 1.0)
}

fn sample_std(v: ArrayView1<'_, f64>) -> f64 {
    sample_var(v).sqrt()
}

fn sample_cov(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let ma = mean(a);
    let mb = mean(b);
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (a.len() as f64 - 1.0)
}

fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    sample_cov(a, b) / (sample_std(a) * sample_std(b))
}
