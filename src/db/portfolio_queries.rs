use crate::models::KeyFigureRow;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_rows(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
    rows: &[KeyFigureRow],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query(
            "INSERT INTO portfolios
                 (session_id, portfolio_id, ticker, historical_return,
                  historical_volatility, beta, expected_return,
                  risk_free_rate, weight, amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(session_id)
        .bind(portfolio_id)
        .bind(&row.ticker)
        .bind(row.historical_return)
        .bind(row.historical_volatility)
        .bind(row.beta)
        .bind(row.expected_return)
        .bind(row.risk_free_rate)
        .bind(row.weight)
        .bind(row.amount)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

/// Stored key figures for one portfolio, drawn from the union of the
/// session's own portfolios and the globally shared example portfolios.
pub async fn fetch_rows(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
) -> Result<Vec<KeyFigureRow>, sqlx::Error> {
    sqlx::query_as::<_, KeyFigureRow>(
        r#"
        WITH session_portfolios AS (
            SELECT portfolio_id, ticker, historical_return, historical_volatility,
                   beta, expected_return, risk_free_rate, weight, amount
            FROM portfolios
            WHERE session_id = $1
        ),
        union_portfolios AS (
            SELECT portfolio_id, ticker, historical_return, historical_volatility,
                   beta, expected_return, risk_free_rate, weight, amount
            FROM example_portfolios
            UNION
            SELECT * FROM session_portfolios
        )
        SELECT ticker, historical_return, historical_volatility, beta,
               expected_return, risk_free_rate, weight, amount
        FROM union_portfolios
        WHERE portfolio_id = $2
        ORDER BY amount ASC
        "#,
    )
    .bind(session_id)
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn exists(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM portfolios
            WHERE session_id = $1 AND portfolio_id = $2
            UNION
            SELECT 1 FROM example_portfolios
            WHERE portfolio_id = $2
        )
        "#,
    )
    .bind(session_id)
    .bind(portfolio_id)
    .fetch_one(pool)
    .await
}

/// Distinct portfolio names visible to a session: its own plus the shared
/// examples.
pub async fn list_names(pool: &PgPool, session_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT portfolio_id FROM example_portfolios
        UNION
        SELECT DISTINCT portfolio_id FROM portfolios
        WHERE session_id = $1
        ORDER BY 1
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_portfolio(
    pool: &PgPool,
    session_id: Uuid,
    portfolio_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM portfolios WHERE session_id = $1 AND portfolio_id = $2",
    )
    .bind(session_id)
    .bind(portfolio_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_session(pool: &PgPool, session_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE session_id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
