//! Identifier generation capability.
//!
//! Aggregates never call `Uuid::new_v4()` themselves; they draw identities from
//! an injected [`IdGenerator`] so tests can supply deterministic ids.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a UUID that has not been handed out before.
    fn next_uuid(&self) -> Uuid;
}

/// Production generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator yielding `00000000-...-0001`, `...-0002`, and so on.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first id is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first id is `start + 1`.
    pub fn starting_after(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_uuid(&self) -> Uuid {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(next))
    }
}
