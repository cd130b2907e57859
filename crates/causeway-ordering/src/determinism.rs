//! Digests over an ordered sequence, for cross-node consistency.
//!
//! Both digests fold only the commitments of the ordered transactions, in
//! sequence order, under distinct tags:
//!
//! - the **ordering root** is handed to the reveal service as proof that a
//!   transaction's position is fixed;
//! - the **DA commitment** is what gets published for availability and
//!   gates finality.
//!
//! Unlike domain assignment these are order-sensitive: swapping two
//! transactions changes the digest.

use causeway_types::{Transaction, constants, digest::fold_commitments};

/// Digest binding every ordered commitment to its position.
///
/// [`CausalDomain`](causeway_types::CausalDomain) computes the same value
/// when its ordering is installed.
#[must_use]
pub fn ordering_root(ordered: &[Transaction]) -> [u8; 32] {
    fold_commitments(constants::ORDERING_ROOT_TAG, ordered)
}

/// DA commitment over an ordered sequence.
#[must_use]
pub fn da_commitment(ordered: &[Transaction]) -> [u8; 32] {
    fold_commitments(constants::DA_COMMIT_TAG, ordered)
}

/// Recompute the DA commitment and compare with `expected`.
#[must_use]
pub fn verify_da_commitment(ordered: &[Transaction], expected: &[u8; 32]) -> bool {
    da_commitment(ordered) == *expected
}

#[cfg(test)]
mod tests {
    use causeway_types::*;

    use super::*;

    fn tx(id: &str, c: u8) -> Transaction {
        Transaction::dummy(id, [c; 32])
    }

    #[test]
    fn same_sequence_same_commitment() {
        let seq = vec![tx("a", 1), tx("b", 2)];
        assert_eq!(da_commitment(&seq), da_commitment(&seq));
    }

    #[test]
    fn order_matters() {
        let ab = vec![tx("a", 1), tx("b", 2)];
        let ba = vec![tx("b", 2), tx("a", 1)];
        assert_ne!(
            da_commitment(&ab),
            da_commitment(&ba),
            "Order of commitments must affect DA commitment"
        );
    }

    #[test]
    fn only_commitments_matter() {
        let mut a = tx("a", 1);
        let b = tx("renamed", 1);
        a.ciphertext = vec![1, 2, 3];
        a.fee = FeeEnvelope::new(99);
        assert_eq!(da_commitment(&[a]), da_commitment(&[b]));
    }

    #[test]
    fn changed_commitment_changes_digest() {
        let before = vec![tx("a", 1), tx("b", 2)];
        let after = vec![tx("a", 1), tx("b", 3)];
        assert_ne!(da_commitment(&before), da_commitment(&after));
    }

    #[test]
    fn length_is_bound() {
        let one = vec![tx("a", 1)];
        let two = vec![tx("a", 1), tx("a", 1)];
        assert_ne!(da_commitment(&one), da_commitment(&two));
    }

    #[test]
    fn roots_are_domain_separated() {
        let seq = vec![tx("a", 1)];
        assert_ne!(ordering_root(&seq), da_commitment(&seq));
    }

    #[test]
    fn ordering_root_matches_installed_domain() {
        let mut d = CausalDomain::new(DomainId::from_digest(&[4; 32]));
        for t in [tx("b", 2), tx("a", 1), tx("c", 3)] {
            d.push(t).unwrap();
        }
        crate::order_domain(&mut d).unwrap();
        assert_eq!(d.ordering_root(), Some(&ordering_root(d.ordered())));
    }

    #[test]
    fn verify_correct_and_wrong() {
        let seq = vec![tx("a", 1), tx("b", 2)];
        let commit = da_commitment(&seq);
        assert!(verify_da_commitment(&seq, &commit));
        assert!(!verify_da_commitment(&seq, &[0xAB; 32]));
    }
}
