//! Per-identity exclusion for broker requests.
//!
//! At most one request per executable identity may run its
//! check-then-mutate sequence at a time. Requests for different identities
//! proceed independently.

use crate::types::ExecutableIdentity;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct IdentityLocks {
    locks: Mutex<HashMap<ExecutableIdentity, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one request. Dropping it releases the identity and
/// discards the lock entry if nobody else is waiting on it.
pub struct IdentityGuard<'a> {
    owner: &'a IdentityLocks,
    identity: ExecutableIdentity,
    guard: Option<OwnedMutexGuard<()>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, identity: &ExecutableIdentity) -> IdentityGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(identity.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        IdentityGuard {
            owner: self,
            identity: identity.clone(),
            guard: Some(guard),
        }
    }

    /// Number of identities with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.owner.locks.lock();
        // Waiters clone the Arc under this map lock, so the count is stable here:
        // one reference means only the map still holds it.
        if locks
            .get(&self.identity)
            .map(|lock| Arc::strong_count(lock) == 1)
            .unwrap_or(false)
        {
            locks.remove(&self.identity);
        }
    }
}
