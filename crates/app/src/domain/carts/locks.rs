//! Per-user write serialization.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::users::UserUuid;

/// Idle locks are pruned once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 1_024;

/// A mutex per user, created on first use.
#[derive(Debug, Default)]
pub(crate) struct UserWriteLocks {
    locks: Mutex<HashMap<UserUuid, Arc<Mutex<()>>>>,
}

impl UserWriteLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `user`'s cart.
    pub(crate) async fn lock(&self, user: UserUuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;

            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }

            Arc::clone(locks.entry(user).or_default())
        };

        lock.lock_owned().await
    }
}
