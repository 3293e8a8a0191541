/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables: the optional PostgreSQL database and the alarm keep-alive
 * interval.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Without a database the server runs with the in-memory alarm store and
 * no account persistence — useful for local development only.
 */
use std::time::Duration;

use sqlx::PgPool;

use crate::alarm::supervisor::DEFAULT_KEEPALIVE_INTERVAL;

/// Database configuration result
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize the database connection pool
///
/// Reads `DATABASE_URL`, connects, and runs migrations. Returns `None` if
/// the variable is unset or the connection fails.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {:?}", e);
            // Continue anyway - migrations might have already been run
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Keep-alive sweep interval for the heartbeat supervisor
///
/// `ALARM_KEEPALIVE_SECS` overrides the 30s default. Must stay below the
/// shortest idle timeout of any proxy in front of the server.
pub fn keepalive_interval() -> Duration {
    match std::env::var("ALARM_KEEPALIVE_SECS") {
        Ok(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                tracing::warn!(
                    "Invalid ALARM_KEEPALIVE_SECS value {:?}, using default",
                    value
                );
                DEFAULT_KEEPALIVE_INTERVAL
            }
        },
        Err(_) => DEFAULT_KEEPALIVE_INTERVAL,
    }
}
