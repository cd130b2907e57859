//! Deterministic write-set → domain assignment.
//!
//! The domain id depends only on the *set* of declared writes: the ids are
//! sorted before hashing, so submission order never changes the result.
//! A separator byte follows every id, which keeps `["ab", "c"]` and
//! `["a", "bc"]` apart.

use causeway_types::{DomainId, ObjectId, constants};
use sha2::{Digest, Sha256};

/// Compute the causal domain of a write set.
#[must_use]
pub fn assign_domain(write_set: &[ObjectId]) -> DomainId {
    let mut ids: Vec<&ObjectId> = write_set.iter().collect();
    ids.sort();

    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([constants::WRITE_SET_SEPARATOR]);
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    DomainId::from_digest(&digest)
}
