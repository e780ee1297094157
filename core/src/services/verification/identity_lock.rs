//! Keyed locks serializing initiate calls for one identity

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held for the duration of one serialized initiate call
pub struct IdentityGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// One async mutex per email and per phone
///
/// A call holding the guard for `(email, phone)` excludes any other call that
/// shares either identifier. Keys are always locked in sorted order so two
/// overlapping calls cannot deadlock. Entries nobody holds are pruned on the
/// next acquire.
#[derive(Default)]
pub struct IdentityLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, email: &str, phone: &str) -> IdentityGuard {
        let mut keys = vec![format!("email:{}", email), format!("phone:{}", phone)];
        keys.sort();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            keys.into_iter()
                .map(|key| locks.entry(key).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        IdentityGuard { _guards: guards }
    }

    /// Number of keys currently tracked
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shared_identifier_blocks() {
        let locks = Arc::new(IdentityLocks::new());
        let guard = locks.acquire("a@x.com", "555").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("b@x.com", "555").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_disjoint_identities_do_not_block() {
        let locks = IdentityLocks::new();
        let _first = locks.acquire("a@x.com", "555").await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b@x.com", "777")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = IdentityLocks::new();
        drop(locks.acquire("a@x.com", "555").await);
        drop(locks.acquire("b@x.com", "777").await);

        assert_eq!(locks.tracked(), 2);
    }
}
