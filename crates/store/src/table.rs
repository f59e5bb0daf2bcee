//! Versioned JSON rows keyed by entity id.

use std::collections::HashMap;

use common::Version;
use domain::Entity;
use domain::ports::{RepositoryError, RepositoryResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// The stored state of one entity.
#[derive(Debug, Clone)]
pub(crate) struct StoredRow {
    /// Version of the last committed save.
    pub version: Version,

    /// Insertion sequence, used for stable listing order.
    pub seq: u64,

    /// Owning entity, for child rows.
    pub parent: Option<Uuid>,

    /// The serialized entity.
    pub state: serde_json::Value,
}

impl StoredRow {
    /// Deserializes the row, stamps its version and re-checks the entity's rules.
    pub fn load<T: Entity + DeserializeOwned>(&self) -> RepositoryResult<T> {
        let mut entity: T = serde_json::from_value(self.state.clone())?;
        entity.set_version(self.version);
        entity.check_invariants()?;
        Ok(entity)
    }
}

/// All rows of one entity type.
#[derive(Debug)]
pub(crate) struct Table {
    entity: &'static str,
    rows: HashMap<Uuid, StoredRow>,
    next_seq: u64,
}

impl Table {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rows: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&StoredRow> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.contains_key(&id)
    }

    /// Returns the stored version, or the initial version for unknown ids.
    pub fn current_version(&self, id: Uuid) -> Version {
        self.rows
            .get(&id)
            .map(|row| row.version)
            .unwrap_or(Version::initial())
    }

    /// Checks that the caller saw the latest version and returns the next one.
    pub fn check_version(&self, id: Uuid, expected: Version) -> RepositoryResult<Version> {
        let actual = self.current_version(id);
        if actual != expected {
            tracing::debug!(
                entity = self.entity,
                %id,
                %expected,
                %actual,
                "Rejected stale write"
            );
            metrics::counter!("store_conflicts_total", "entity" => self.entity).increment(1);
            return Err(RepositoryError::ConcurrencyConflict {
                entity: self.entity,
                id: id.to_string(),
                expected,
                actual,
            });
        }
        Ok(actual.next())
    }

    /// Inserts or replaces a row, keeping the original insertion sequence.
    pub fn upsert(
        &mut self,
        id: Uuid,
        version: Version,
        parent: Option<Uuid>,
        state: serde_json::Value,
    ) {
        let seq = match self.rows.get(&id) {
            Some(row) => row.seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.rows.insert(
            id,
            StoredRow {
                version,
                seq,
                parent,
                state,
            },
        );
    }

    pub fn remove(&mut self, id: Uuid) -> RepositoryResult<StoredRow> {
        self.rows
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found(self.entity, id))
    }

    /// Rows in insertion order.
    pub fn ordered(&self) -> Vec<&StoredRow> {
        let mut rows: Vec<&StoredRow> = self.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        rows
    }

    /// Ids in insertion order.
    pub fn ordered_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<(u64, Uuid)> = self.rows.iter().map(|(id, row)| (row.seq, *id)).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Child rows of `parent` in insertion order.
    pub fn children_of(&self, parent: Uuid) -> Vec<&StoredRow> {
        let mut rows: Vec<&StoredRow> = self
            .rows
            .values()
            .filter(|row| row.parent == Some(parent))
            .collect();
        rows.sort_by_key(|row| row.seq);
        rows
    }

    pub fn count_children(&self, parent: Uuid) -> usize {
        self.rows
            .values()
            .filter(|row| row.parent == Some(parent))
            .count()
    }

    /// Loads every row in insertion order.
    pub fn load_all<T: Entity + DeserializeOwned>(&self) -> RepositoryResult<Vec<T>> {
        self.ordered().into_iter().map(StoredRow::load).collect()
    }
}

pub(crate) fn encode<T: Serialize>(entity: &T) -> RepositoryResult<serde_json::Value> {
    Ok(serde_json::to_value(entity)?)
}
