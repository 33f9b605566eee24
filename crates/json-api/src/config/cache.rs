//! Cache Config

use std::time::Duration;

use clap::Args;

/// Longest accepted cart cache TTL.
pub const MAX_CART_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Cart cache settings.
#[derive(Debug, Args)]
pub struct CacheConfig {
    /// Redis connection string; carts are cached in process memory when unset
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: Option<String>,

    /// Lifetime of a cached cart in seconds, at most one year
    #[arg(
        long,
        env = "CART_CACHE_TTL_SECS",
        default_value_t = 86_400_u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_CART_CACHE_TTL_SECS),
    )]
    pub cart_cache_ttl_secs: u64,
}

impl CacheConfig {
    /// The configured TTL as a [`Duration`].
    #[must_use]
    pub fn cart_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cart_cache_ttl_secs)
    }
}
