//! Ledger state objects.
//!
//! Only the execution engine mutates state objects, and only those named
//! in the executing transaction's write set. `version` bumps on every
//! successful mutation and doubles as the optimistic-concurrency marker
//! for versioned writes.

use serde::{Deserialize, Serialize};

use crate::ObjectId;

/// A versioned balance-holding object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateObject {
    pub id: ObjectId,
    pub version: u64,
    pub balance: u64,
}

impl StateObject {
    #[must_use]
    pub fn new(id: ObjectId, version: u64, balance: u64) -> Self {
        Self {
            id,
            version,
            balance,
        }
    }

    /// The same object with a new balance and the version bumped by one.
    #[must_use]
    pub fn with_balance(&self, balance: u64) -> Self {
        Self {
            id: self.id.clone(),
            version: self.version + 1,
            balance,
        }
    }
}

/// A conditional write: applies only if the stored version still equals
/// `expected_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedWrite {
    pub expected_version: u64,
    pub object: StateObject,
}

impl VersionedWrite {
    /// Write `next` over the state it was derived from.
    #[must_use]
    pub fn replacing(prev: &StateObject, next: StateObject) -> Self {
        Self {
            expected_version: prev.version,
            object: next,
        }
    }
}
