//! Server configuration module

use clap::Parser;
use dishpatch_app::context::AppSettings;

use crate::config::{
    cache::CacheConfig,
    carts::CartsConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod cache;
pub(crate) mod carts;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Dishpatch JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "dishpatch-json", about = "Dishpatch JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cart cache settings.
    #[command(flatten)]
    pub cache: CacheConfig,

    /// Cart write behaviour.
    #[command(flatten)]
    pub carts: CartsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings used to build the application context.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            redis_url: self.cache.redis_url.clone(),
            cart_cache_ttl: self.cache.cart_cache_ttl(),
            serialize_cart_writes: self.carts.serialize_cart_writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "dishpatch-json",
            "--database-url",
            "postgres://localhost/dishpatch",
        ])?;

        assert_eq!(config.socket_addr(), "127.0.0.1:8698");
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);
        assert_eq!(config.server.shutdown_drain(), Duration::from_secs(10));

        let settings = config.app_settings();

        assert_eq!(settings.database_url, "postgres://localhost/dishpatch");
        assert_eq!(settings.redis_url, None);
        assert_eq!(settings.cart_cache_ttl, Duration::from_secs(86_400));
        assert!(!settings.serialize_cart_writes, "writes are unserialized by default");

        Ok(())
    }

    #[test]
    fn cache_and_cart_flags_flow_into_app_settings() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "dishpatch-json",
            "--database-url",
            "postgres://localhost/dishpatch",
            "--redis-url",
            "redis://localhost:6379",
            "--cart-cache-ttl-secs",
            "60",
            "--serialize-cart-writes",
        ])?;

        let settings = config.app_settings();

        assert_eq!(settings.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(settings.cart_cache_ttl, Duration::from_secs(60));
        assert!(settings.serialize_cart_writes, "flag should enable serialization");

        Ok(())
    }

    #[test]
    fn cart_cache_ttl_is_bounded() {
        for ttl in ["0", "31536001", "18446744073709551615"] {
            let result = ServerConfig::try_parse_from([
                "dishpatch-json",
                "--database-url",
                "postgres://localhost/dishpatch",
                "--cart-cache-ttl-secs",
                ttl,
            ]);

            assert!(result.is_err(), "ttl {ttl} should be rejected");
        }
    }
}
