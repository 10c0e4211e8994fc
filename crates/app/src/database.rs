//! Database connection management

use std::{str::FromStr, time::Duration};

use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::MigrateError,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// How long a caller waits for a free connection before failing.
    pub acquire_timeout: Duration,

    /// Server-side cap on a single statement; `None` leaves the server default.
    pub statement_timeout: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Some(Duration::from_secs(5)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// Dropping the returned transaction without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or `BEGIN` fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL` with default pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect_with(database_url, PoolSettings::default()).await
}

/// Connect to `PostgreSQL` with explicit pool settings.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the connection cannot be established.
pub async fn connect_with(
    database_url: &str,
    settings: PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(database_url)?;

    if let Some(timeout) = settings.statement_timeout {
        options = options.options([("statement_timeout", format!("{}ms", timeout.as_millis()))]);

        info!(
            statement_timeout_ms = timeout.as_millis(),
            "statement timeout configured"
        );
    }

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
