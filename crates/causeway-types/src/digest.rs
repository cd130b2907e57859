//! Tagged SHA-256 fold over the commitments of an ordered sequence.
//!
//! The ordering root and the DA commitment are both this fold under
//! different tags (see [`constants::ORDERING_ROOT_TAG`] and
//! [`constants::DA_COMMIT_TAG`]). Only commitments are hashed, in sequence
//! order, prefixed by the sequence length.

use sha2::{Digest, Sha256};

use crate::{Transaction, constants};

/// Fold the commitments of `ordered` under `tag`.
#[must_use]
pub fn fold_commitments(tag: &[u8], ordered: &[Transaction]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(tag);
    hasher.update((ordered.len() as u64).to_le_bytes());
    for tx in ordered {
        hasher.update(tx.commitment.as_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Ordering root of `ordered`.
#[must_use]
pub fn ordering_root(ordered: &[Transaction]) -> [u8; 32] {
    fold_commitments(constants::ORDERING_ROOT_TAG, ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_separate_digests() {
        let seq = [Transaction::dummy("a", [1; 32])];
        assert_ne!(
            fold_commitments(constants::ORDERING_ROOT_TAG, &seq),
            fold_commitments(constants::DA_COMMIT_TAG, &seq)
        );
        assert_eq!(ordering_root(&seq), fold_commitments(constants::ORDERING_ROOT_TAG, &seq));
    }

    #[test]
    fn empty_sequence_still_tagged() {
        assert_ne!(ordering_root(&[]), [0; 32]);
        assert_eq!(ordering_root(&[]), ordering_root(&[]));
    }
}
