use crate::errors::AppError;
use crate::models::ProjectionPath;

const DAYS_PER_YEAR: f64 = 365.25;

/// Closed-form geometric Brownian motion projection: the median price path
/// and a symmetric log-space confidence band, one point per calendar day.
///
/// `expected_return` and `volatility` are decimal fractions (0.08 means 8%
/// annual drift); callers converting from percent quotes must divide by 100
/// before calling. `z` is the normal quantile for the desired confidence
/// level (1.96 for 95%) and is supplied by the caller.
pub fn project_prices(
    current_price: f64,
    expected_return: f64,
    volatility: f64,
    horizon_years: f64,
    z: f64,
) -> Result<ProjectionPath, AppError> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(AppError::InvalidInput(
            "current price must be positive".to_string(),
        ));
    }
    if !horizon_years.is_finite() || horizon_years <= 0.0 {
        return Err(AppError::InvalidInput(
            "projection horizon must be positive".to_string(),
        ));
    }
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(AppError::InvalidInput(
            "volatility must be non-negative".to_string(),
        ));
    }
    if !z.is_finite() || z <= 0.0 {
        return Err(AppError::InvalidInput(
            "confidence quantile z must be positive".to_string(),
        ));
    }
    if !expected_return.is_finite() {
        return Err(AppError::InvalidInput(
            "expected return must be finite".to_string(),
        ));
    }

    let days = (horizon_years * DAYS_PER_YEAR).floor() as usize;
    let ln_current = current_price.ln();
    let drift = expected_return - volatility * volatility / 2.0;

    let mut expected = Vec::with_capacity(days);
    let mut lower = Vec::with_capacity(days);
    let mut upper = Vec::with_capacity(days);

    for t in 1..=days {
        let tau = t as f64 / DAYS_PER_YEAR;
        let ln_price = ln_current + tau * drift;
        let half_width = z * volatility * tau.sqrt();

        expected.push(ln_price.exp());
        lower.push((ln_price - half_width).exp());
        upper.push((ln_price + half_width).exp());
    }

    Ok(ProjectionPath {
        expected,
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_length_is_floor_of_calendar_days() {
        for (years, expected_len) in [(1.0, 365), (10.0, 3652), (30.0, 10957)] {
            let path = project_prices(100.0, 0.05, 0.1, years, 1.96).unwrap();
            assert_eq!(path.len(), expected_len);
            assert_eq!(path.lower.len(), expected_len);
            assert_eq!(path.upper.len(), expected_len);
        }
    }

    #[test]
    fn test_zero_volatility_collapses_the_band() {
        let path = project_prices(10.0, 0.08, 0.0, 2.0, 1.96).unwrap();

        for t in 0..path.len() {
            assert_eq!(path.expected[t], path.lower[t]);
            assert_eq!(path.expected[t], path.upper[t]);
            let tau = (t + 1) as f64 / 365.25;
            let reference = 10.0 * (tau * 0.08).exp();
            assert!((path.expected[t] - reference).abs() < 1e-9);
        }
    }

    #[test]
    fn test_band_is_ordered_and_strictly_positive() {
        let path = project_prices(10.0, 0.08, 0.2, 10.0, 1.96).unwrap();

        assert_eq!(path.len(), 3652);
        for t in 0..path.len() {
            assert!(path.lower[t] > 0.0);
            assert!(path.lower[t] <= path.expected[t]);
            assert!(path.expected[t] <= path.upper[t]);
        }
    }

    #[test]
    fn test_band_widens_with_horizon() {
        let path = project_prices(100.0, 0.0, 0.3, 1.0, 1.645).unwrap();

        let early = path.upper[0] / path.lower[0];
        let late = path.upper[path.len() - 1] / path.lower[path.len() - 1];
        assert!(late > early);
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        assert!(matches!(
            project_prices(0.0, 0.08, 0.2, 1.0, 1.96),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            project_prices(-5.0, 0.08, 0.2, 1.0, 1.96),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_positive_horizon_is_rejected() {
        assert!(matches!(
            project_prices(10.0, 0.08, 0.2, 0.0, 1.96),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_volatility_is_rejected() {
        assert!(matches!(
            project_prices(10.0, 0.08, -0.1, 1.0, 1.96),
            Err(AppError::InvalidInput(_))
        ));
    }
}
