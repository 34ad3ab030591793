//! PostgreSQL connection pool management

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::{
    config::DatabaseConfig,
    error::{Error, Result},
};

/// Create a PostgreSQL connection pool, retrying with exponential backoff
///
/// Makes `max_retries + 1` attempts in total. The delay starts at
/// `retry_delay_secs` and doubles after every failure.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                tracing::info!(
                    url = %sanitize_connection_url(&config.url),
                    attempts = attempt + 1,
                    "Database connection pool created: max={}, min={}",
                    config.max_connections,
                    config.min_connections
                );
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        attempt,
                        e
                    );
                    return Err(e);
                }

                let delay = base_delay.saturating_mul(2_u32.saturating_pow(attempt - 1));
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connection_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| {
            Error::Database(format!(
                "{} at '{}': {}",
                categorize_db_error(&e),
                sanitize_connection_url(&config.url),
                e
            ))
        })
}

/// Mask the password of a connection URL for logging
fn sanitize_connection_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let Some(at_offset) = url[authority_start..].find('@') else {
        return url.to_string();
    };
    let at_pos = authority_start + at_offset;

    match url[authority_start..at_pos].find(':') {
        Some(colon) => format!(
            "{}***{}",
            &url[..authority_start + colon + 1],
            &url[at_pos..]
        ),
        None => url.to_string(),
    }
}

fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "Invalid database configuration",
        Error::Database(_) => "Database rejected the connection",
        Error::Io(_) => "Network I/O error",
        Error::Tls(_) => "TLS error",
        Error::PoolTimedOut => "Connection pool timeout",
        Error::PoolClosed => "Connection pool closed",
        _ => "Connection error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_masks_password() {
        assert_eq!(
            sanitize_connection_url("postgres://books:s3cret@db:5432/books"),
            "postgres://books:***@db:5432/books"
        );
    }

    #[test]
    fn test_sanitize_without_password() {
        assert_eq!(
            sanitize_connection_url("postgres://books@db/books"),
            "postgres://books@db/books"
        );
        assert_eq!(
            sanitize_connection_url("postgres://localhost/books"),
            "postgres://localhost/books"
        );
    }

    #[test]
    fn test_categorize() {
        assert_eq!(
            categorize_db_error(&sqlx::Error::PoolTimedOut),
            "Connection pool timeout"
        );
        assert_eq!(
            categorize_db_error(&sqlx::Error::RowNotFound),
            "Connection error"
        );
    }

    #[tokio::test]
    async fn test_create_pool_gives_up_after_retries() {
        let config = DatabaseConfig {
            url: "not a url".to_string(),
            max_connections: 1,
            min_connections: 0,
            connection_timeout_secs: 1,
            max_retries: 0,
            retry_delay_secs: 0,
            auto_create_schema: false,
        };
        let err = create_pool(&config).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
