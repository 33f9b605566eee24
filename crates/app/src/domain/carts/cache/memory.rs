//! In-process cart cache.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use tokio::{sync::RwLock, time::Instant};

use super::{CartCache, cart_cache_key, decode, encode};
use crate::{
    domain::carts::{errors::CartCacheError, records::CartRecord},
    users::UserUuid,
};

/// Expired entries are only swept once the map grows past this many keys.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Entry {
    payload: String,

    /// `None` when the TTL is too large to represent; such entries live until
    /// deleted.
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(payload: String, now: Instant, ttl: Duration) -> Self {
        Self {
            payload,
            expires_at: now.checked_add(ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Cart cache held in process memory. Entries are serialized exactly as the
/// Redis adapter stores them and expire lazily: reads ignore stale entries and
/// writes sweep them once the map exceeds [`PRUNE_THRESHOLD`] keys.
#[derive(Debug, Default)]
pub struct MemoryCartCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCartCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();

        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether no live entries remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Store a raw payload under the user's key, bypassing serialization.
    pub async fn insert_raw(&self, user: UserUuid, payload: impl Into<String>, ttl: Duration) {
        self.insert(cart_cache_key(user), Entry::new(payload.into(), Instant::now(), ttl))
            .await;
    }

    #[cfg(test)]
    async fn stored_len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn insert(&self, key: String, entry: Entry) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.len() >= PRUNE_THRESHOLD {
            entries.retain(|_, entry| !entry.is_expired(now));
        }

        entries.insert(key, entry);
    }
}

#[async_trait]
impl CartCache for MemoryCartCache {
    async fn get(&self, user: UserUuid) -> Result<Option<CartRecord>, CartCacheError> {
        let key = cart_cache_key(user);
        let now = Instant::now();

        let entries = self.entries.read().await;

        match entries.get(&key) {
            Some(entry) if !entry.is_expired(now) => decode(&entry.payload).map(Some),
            _ => Ok(None),
        }
    }

    async fn set(&self, user: UserUuid, cart: &CartRecord, ttl: Duration) -> Result<(), CartCacheError> {
        let payload = encode(cart)?;

        self.insert(cart_cache_key(user), Entry::new(payload, Instant::now(), ttl))
            .await;

        Ok(())
    }

    async fn delete(&self, user: UserUuid) -> Result<(), CartCacheError> {
        self.entries.write().await.remove(&cart_cache_key(user));

        Ok(())
    }
}
