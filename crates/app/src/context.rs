//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db, PoolSettings},
    domain::{
        carts::{CartsService, StoreCartsService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

/// Long-lived service handles, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<dyn ProductsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(
        url: &str,
        settings: PoolSettings,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect_with(url, settings)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let db = Db::new(pool.clone());

        Ok(Self {
            carts: Arc::new(StoreCartsService::postgres(db.clone())),
            products: Arc::new(PgProductsService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
