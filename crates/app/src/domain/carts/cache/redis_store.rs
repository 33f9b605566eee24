//! Redis-backed cart cache.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::info;

use super::{CartCache, cart_cache_key, decode, encode};
use crate::{
    domain::carts::{errors::CartCacheError, records::CartRecord},
    users::UserUuid,
};

/// [`CartCache`] stored in Redis with per-key expiry.
#[derive(Clone)]
pub struct RedisCartCache {
    connection: ConnectionManager,
}

impl RedisCartCache {
    /// Connect and verify the server answers `PING`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self, CartCacheError> {
        let client = Client::open(url)?;
        let mut connection = client.get_connection_manager().await?;

        redis::cmd("PING")
            .query_async::<String>(&mut connection)
            .await?;

        info!("connected to redis cart cache");

        Ok(Self { connection })
    }
}

impl Debug for RedisCartCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RedisCartCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl CartCache for RedisCartCache {
    async fn get(&self, user: UserUuid) -> Result<Option<CartRecord>, CartCacheError> {
        let mut connection = self.connection.clone();

        let payload: Option<String> = connection.get(cart_cache_key(user)).await?;

        payload.as_deref().map(decode).transpose()
    }

    async fn set(&self, user: UserUuid, cart: &CartRecord, ttl: Duration) -> Result<(), CartCacheError> {
        let payload = encode(cart)?;
        let mut connection = self.connection.clone();

        // SET EX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);

        connection
            .set_ex::<_, _, ()>(cart_cache_key(user), payload, seconds)
            .await?;

        Ok(())
    }

    async fn delete(&self, user: UserUuid) -> Result<(), CartCacheError> {
        let mut connection = self.connection.clone();

        connection.del::<_, ()>(cart_cache_key(user)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testcontainers::{ContainerAsync, runners::AsyncRunner as _};
    use testcontainers_modules::redis::{REDIS_PORT, Redis};
    use testresult::TestResult;

    use super::*;
    use crate::domain::carts::records::CartUuid;

    async fn start_redis() -> TestResult<(ContainerAsync<Redis>, RedisCartCache)> {
        let container = Redis::default().start().await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(REDIS_PORT).await?;

        let cache = RedisCartCache::connect(&format!("redis://{host}:{port}")).await?;

        Ok((container, cache))
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon for testcontainers"]
    async fn set_get_delete_against_redis() -> TestResult {
        let (_container, cache) = start_redis().await?;
        let user = UserUuid::new();
        let cart = CartRecord::empty(CartUuid::new(), user);

        assert_eq!(cache.get(user).await?, None, "fresh key should miss");

        cache.set(user, &cart, Duration::from_secs(60)).await?;

        assert_eq!(cache.get(user).await?, Some(cart), "cached cart should round trip");

        cache.delete(user).await?;

        assert_eq!(cache.get(user).await?, None, "deleted key should miss");

        Ok(())
    }
}
