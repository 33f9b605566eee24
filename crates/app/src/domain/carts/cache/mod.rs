//! Cart cache
//!
//! A best-effort, TTL-bounded copy of each user's cart keyed by
//! `cart:{user_uuid}`. The store stays authoritative: entries are dropped on
//! every write and rebuilt by the next read.

mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::carts::{errors::CartCacheError, records::CartRecord},
    users::UserUuid,
};

pub use memory::MemoryCartCache;
pub use redis_store::RedisCartCache;

/// How long a cached cart lives unless a write invalidates it first.
pub const DEFAULT_CART_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache key for a user's cart.
#[must_use]
pub fn cart_cache_key(user: UserUuid) -> String {
    format!("cart:{user}")
}

/// Cache of whole carts keyed by user, written on read and dropped on write.
#[automock]
#[async_trait]
pub trait CartCache: Send + Sync {
    /// Fetch the cached cart, `None` on a miss or an expired entry.
    async fn get(&self, user: UserUuid) -> Result<Option<CartRecord>, CartCacheError>;

    /// Cache the cart for `ttl`.
    async fn set(&self, user: UserUuid, cart: &CartRecord, ttl: Duration) -> Result<(), CartCacheError>;

    /// Drop the cached cart. Deleting a missing key is not an error.
    async fn delete(&self, user: UserUuid) -> Result<(), CartCacheError>;
}

fn encode(cart: &CartRecord) -> Result<String, CartCacheError> {
    Ok(serde_json::to_string(cart)?)
}

fn decode(payload: &str) -> Result<CartRecord, CartCacheError> {
    Ok(serde_json::from_str(payload)?)
}
