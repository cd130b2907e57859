//! Versioned state store.
//!
//! The execution engine reads objects, derives their next versions, and
//! hands the whole set of writes to [`StateStore::commit`], which applies
//! all of them or none. A write only lands if the stored version still
//! equals the version it was derived from, so two executions racing on the
//! same object can never both succeed against the same snapshot.

use std::collections::HashMap;

use causeway_types::{ObjectId, StateObject, VersionedWrite};
use parking_lot::RwLock;
use thiserror::Error;

/// Rejection of a versioned commit. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored version moved since the write was derived.
    #[error("version conflict on {object}: expected {expected}, found {actual}")]
    VersionConflict {
        object: ObjectId,
        expected: u64,
        actual: u64,
    },

    /// A write targets an object the store does not hold.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
}

/// Keyed `ObjectId -> StateObject` storage with conditional batch writes.
pub trait StateStore: Send + Sync {
    /// Current state of an object.
    fn get(&self, id: &ObjectId) -> Option<StateObject>;

    /// Unconditionally insert or replace an object (genesis / seeding).
    fn put(&self, object: StateObject);

    /// Apply every write if all expected versions match, otherwise none.
    fn commit(&self, writes: &[VersionedWrite]) -> Result<(), StoreError>;
}

/// In-memory [`StateStore`] behind a single reader-writer lock.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    objects: RwLock<HashMap<ObjectId, StateObject>>,
}

impl InMemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with initial objects.
    #[must_use]
    pub fn with_objects(objects: impl IntoIterator<Item = StateObject>) -> Self {
        let store = Self::new();
        {
            let mut map = store.objects.write();
            for obj in objects {
                map.insert(obj.id.clone(), obj);
            }
        }
        store
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_balance(&self) -> u128 {
        self.objects
            .read()
            .values()
            .map(|o| u128::from(o.balance))
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, id: &ObjectId) -> Option<StateObject> {
        self.objects.read().get(id).cloned()
    }

    fn put(&self, object: StateObject) {
        self.objects.write().insert(object.id.clone(), object);
    }

    fn commit(&self, writes: &[VersionedWrite]) -> Result<(), StoreError> {
        let mut map = self.objects.write();
        for w in writes {
            let current = map
                .get(&w.object.id)
                .ok_or_else(|| StoreError::UnknownObject(w.object.id.clone()))?;
            if current.version != w.expected_version {
                return Err(StoreError::VersionConflict {
                    object: w.object.id.clone(),
                    expected: w.expected_version,
                    actual: current.version,
                });
            }
        }
        for w in writes {
            map.insert(w.object.id.clone(), w.object.clone());
        }
        Ok(())
    }
}
