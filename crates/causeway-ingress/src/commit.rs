//! Submitter-side commitment construction.
//!
//! Builds a [`Transaction`] from an already-encrypted payload: the
//! commitment is a SHA-256 over the ciphertext and a submitter nonce, and
//! the transaction id is the hex of its first 8 bytes. The nonce lets the
//! same payload be submitted twice under distinct commitments.

use causeway_types::{Commitment, FeeEnvelope, ObjectId, Transaction, TxId};
use sha2::{Digest, Sha256};

/// Inputs for [`commit_transaction`].
#[derive(Debug, Clone)]
pub struct CommitParams {
    pub ciphertext: Vec<u8>,
    pub read_set: Vec<ObjectId>,
    pub write_set: Vec<ObjectId>,
    pub max_fee: u64,
    pub nonce: u64,
}

/// Compute the commitment binding `ciphertext` under `nonce`.
#[must_use]
pub fn compute_commitment(ciphertext: &[u8], nonce: u64) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(b"causeway:commitment:v1:");
    hasher.update(nonce.to_le_bytes());
    hasher.update(ciphertext);
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    Commitment::new(bytes)
}

/// Build a submittable transaction from an encrypted payload.
#[must_use]
pub fn commit_transaction(params: CommitParams) -> Transaction {
    let commitment = compute_commitment(&params.ciphertext, params.nonce);
    Transaction {
        id: TxId::new(hex::encode(&commitment.as_bytes()[..8])),
        read_set: params.read_set,
        write_set: params.write_set,
        fee: FeeEnvelope::new(params.max_fee),
        commitment,
        ciphertext: params.ciphertext,
    }
}
