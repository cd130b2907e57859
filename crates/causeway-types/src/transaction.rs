//! Transaction types.
//!
//! A transaction is submitted as ciphertext plus a commitment to it. The
//! declared read and write sets are the only plaintext the pipeline sees
//! before ordering is fixed.

use serde::{Deserialize, Serialize};

use crate::{Commitment, ObjectId, TxId};

/// Fee envelope attached to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeEnvelope {
    pub max_fee: u64,
}

impl FeeEnvelope {
    #[must_use]
    pub fn new(max_fee: u64) -> Self {
        Self { max_fee }
    }
}

/// An encrypted transaction with its declared access sets.
///
/// `read_set` and `write_set` are ordered sequences used as sets:
/// duplicates are tolerated and carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub read_set: Vec<ObjectId>,
    pub write_set: Vec<ObjectId>,
    pub fee: FeeEnvelope,
    pub commitment: Commitment,
    /// Opaque encrypted payload. Never inspected before reveal.
    pub ciphertext: Vec<u8>,
}

impl Transaction {
    /// Whether `object` is declared in the write set.
    #[must_use]
    pub fn writes(&self, object: &ObjectId) -> bool {
        self.write_set.contains(object)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Transaction {
    /// A structurally valid transaction with the given commitment.
    pub fn dummy(id: &str, commitment: [u8; 32]) -> Self {
        Self {
            id: TxId::new(id),
            read_set: vec![ObjectId::account("Alice"), ObjectId::account("Bob")],
            write_set: vec![ObjectId::account("Alice"), ObjectId::account("Bob")],
            fee: FeeEnvelope::new(1),
            commitment: Commitment::new(commitment),
            ciphertext: b"opaque".to_vec(),
        }
    }

    /// A valid transaction with a random commitment.
    #[cfg(feature = "test-helpers")]
    pub fn dummy_random(id: &str) -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::dummy(id, bytes)
    }
}
