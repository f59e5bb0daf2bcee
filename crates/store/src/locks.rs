//! Per-entity write locks backing `lock_by_id`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domain::ports::LockLease;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockKey = (&'static str, Uuid);
type LockMap = Arc<Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>>;

fn entries(locks: &LockMap) -> MutexGuard<'_, HashMap<LockKey, Arc<AsyncMutex<()>>>> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands out one async mutex per (entity type, id).
///
/// An entry lives only while a lease holds it or a caller waits for it.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: LockMap,
}

impl LockRegistry {
    /// Waits until no other lease for the same entity is alive.
    pub async fn acquire(&self, entity: &'static str, id: Uuid) -> LockLease {
        let key = (entity, id);
        let mutex = Arc::clone(entries(&self.locks).entry(key).or_default());
        let guard = Arc::clone(&mutex).lock_owned().await;
        tracing::trace!(entity, %id, "Acquired entity lock");
        LockLease::new(EntityGuard {
            guard: Some(guard),
            mutex,
            key,
            locks: Arc::clone(&self.locks),
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        entries(&self.locks).len()
    }
}

/// Unlocks on drop and forgets the entry once nobody else refers to it.
struct EntityGuard {
    guard: Option<OwnedMutexGuard<()>>,
    mutex: Arc<AsyncMutex<()>>,
    key: LockKey,
    locks: LockMap,
}

impl Drop for EntityGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = entries(&self.locks);
        // The registry entry and `self.mutex` are the only references left.
        let unused = Arc::strong_count(&self.mutex) == 2
            && locks
                .get(&self.key)
                .is_some_and(|entry| Arc::ptr_eq(entry, &self.mutex));
        if unused {
            locks.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn second_lease_waits_for_first() {
        let registry = Arc::new(LockRegistry::default());
        let id = Uuid::new_v4();

        let lease = registry.acquire("room", id).await;
        let contender = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.acquire("room", id).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(lease);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_entities_do_not_contend() {
        let registry = LockRegistry::default();
        let id = Uuid::new_v4();

        let _room = registry.acquire("room", id).await;
        let _room_type = tokio::time::timeout(
            Duration::from_millis(100),
            registry.acquire("room_type", id),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn entries_are_dropped_with_the_last_lease() {
        let registry = Arc::new(LockRegistry::default());
        let id = Uuid::new_v4();

        let lease = registry.acquire("floor", id).await;
        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.acquire("floor", id).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(lease);
        assert_eq!(registry.len(), 1);

        let second = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registry.len(), 1);
        drop(second);
        assert_eq!(registry.len(), 0);

        for _ in 0..10 {
            drop(registry.acquire("hotel_room", Uuid::new_v4()).await);
        }
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn abandoned_waits_do_not_pin_entries() {
        let registry = LockRegistry::default();
        let id = Uuid::new_v4();

        let lease = registry.acquire("room_type", id).await;
        let gave_up =
            tokio::time::timeout(Duration::from_millis(10), registry.acquire("room_type", id))
                .await;
        assert!(gave_up.is_err());

        drop(lease);
        assert_eq!(registry.len(), 0);
    }
}
