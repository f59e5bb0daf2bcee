//! Bounded lock acquisition and the optimistic fallback.

use std::fmt::Display;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use domain::ports::{Locked, RepositoryResult};

use crate::error::{ServiceError, ServiceResult};

/// An aggregate loaded for modification.
///
/// `Locked` keeps the repository lease alive until dropped. `Loaded` came from
/// a plain read and relies on the version check at save time.
#[derive(Debug)]
pub(crate) enum Held<T> {
    Locked(Locked<T>),
    Loaded(T),
}

impl<T> Held<T> {
    /// Drops the lease, if any, and returns the value.
    pub fn release(self) -> T {
        match self {
            Held::Locked(locked) => locked.release(),
            Held::Loaded(value) => value,
        }
    }
}

impl<T> Deref for Held<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Held::Locked(locked) => &**locked,
            Held::Loaded(value) => value,
        }
    }
}

impl<T> DerefMut for Held<T> {
    fn deref_mut(&mut self) -> &mut T {
        match self {
            Held::Locked(locked) => &mut **locked,
            Held::Loaded(value) => value,
        }
    }
}

/// Waits at most `limit` for `lock` to resolve.
pub(crate) async fn bounded<T>(
    entity: &'static str,
    id: impl Display,
    limit: Duration,
    lock: impl Future<Output = RepositoryResult<Locked<T>>>,
) -> ServiceResult<Locked<T>> {
    match tokio::time::timeout(limit, lock).await {
        Ok(locked) => Ok(locked?),
        Err(_) => {
            let waited_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(entity, %id, waited_ms, "Timed out waiting for entity lock");
            Err(ServiceError::LockTimeout {
                entity,
                id: id.to_string(),
                waited_ms,
            })
        }
    }
}
