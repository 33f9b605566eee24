//! App Context

use std::{sync::Arc, time::Duration};

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{
            CachedCartsService, CartCache, CartCacheError, CartsService, MemoryCartCache,
            PgCartStore, RedisCartCache, cache::DEFAULT_CART_CACHE_TTL,
        },
        products::PgProductCatalog,
    },
};

/// Failures while wiring [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Postgres was unreachable.
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    /// A schema migration failed.
    #[error("failed to run database migrations")]
    Migration(#[source] MigrateError),

    /// Redis was unreachable.
    #[error("failed to connect to cart cache")]
    Cache(#[source] CartCacheError),
}

/// Settings needed to wire the application services together.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Postgres connection string.
    pub database_url: String,

    /// When absent carts are cached in process memory.
    pub redis_url: Option<String>,

    /// Lifetime of a cached cart.
    pub cart_cache_ttl: Duration,

    /// Serialize writes to the same cart within this process.
    pub serialize_cart_writes: bool,
}

impl AppSettings {
    /// Defaults for everything but the database.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            redis_url: None,
            cart_cache_ttl: DEFAULT_CART_CACHE_TTL,
            serialize_cart_writes: false,
        }
    }
}

/// Services shared by request handlers.
#[derive(Clone)]
pub struct AppContext {
    /// Cart operations.
    pub carts: Arc<dyn CartsService>,
    /// Bearer token authentication.
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Connect to the database and cache, apply migrations and build services.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable, a migration fails,
    /// or a configured Redis server cannot be reached.
    pub async fn connect(settings: &AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migration)?;

        let cache: Arc<dyn CartCache> = match &settings.redis_url {
            Some(url) => {
                info!("using redis cart cache");

                Arc::new(
                    RedisCartCache::connect(url)
                        .await
                        .map_err(AppInitError::Cache)?,
                )
            }
            None => {
                info!("REDIS_URL not set, using in-memory cart cache");

                Arc::new(MemoryCartCache::new())
            }
        };

        Ok(Self::from_parts(Db::new(pool), cache, settings))
    }

    /// Build services over an existing database handle and cache.
    #[must_use]
    pub fn from_parts(db: Db, cache: Arc<dyn CartCache>, settings: &AppSettings) -> Self {
        let mut carts = CachedCartsService::new(
            Arc::new(PgCartStore::new(db.clone())),
            cache,
            Arc::new(PgProductCatalog::new(db.clone())),
        )
        .with_cache_ttl(settings.cart_cache_ttl);

        if settings.serialize_cart_writes {
            carts = carts.with_serialized_writes();
        }

        Self {
            carts: Arc::new(carts),
            auth: Arc::new(PgAuthService::new(db)),
        }
    }
}
