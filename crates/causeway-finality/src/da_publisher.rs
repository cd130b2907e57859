//! DA publication for executed domains.
//!
//! The DA commitment folds the ordered commitments of a domain (see
//! [`causeway_ordering::da_commitment`]). Publishing records it on the
//! domain and asks the external DA network, behind [`DaAttestor`], to
//! attest that the sequence is retrievable. Only an attested publication
//! makes the domain `da_ready`.

use std::sync::Arc;

use causeway_ordering::{da_commitment, verify_da_commitment};
use causeway_types::{CausalDomain, Commitment, DomainId, FinalityError, Result};

/// Boundary to the data availability network.
pub trait DaAttestor: Send + Sync {
    /// Whether the network attests that `commitments`, digested as
    /// `da_commit`, are available for `domain_id`.
    fn attest(
        &self,
        domain_id: &DomainId,
        da_commit: &[u8; 32],
        commitments: &[Commitment],
    ) -> bool;
}

impl<T: DaAttestor + ?Sized> DaAttestor for Arc<T> {
    fn attest(
        &self,
        domain_id: &DomainId,
        da_commit: &[u8; 32],
        commitments: &[Commitment],
    ) -> bool {
        (**self).attest(domain_id, da_commit, commitments)
    }
}

/// Single-node attestor: local publication counts as available.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAttestor;

impl DaAttestor for LocalAttestor {
    fn attest(
        &self,
        _domain_id: &DomainId,
        _da_commit: &[u8; 32],
        _commitments: &[Commitment],
    ) -> bool {
        true
    }
}

/// Attestor that never confirms availability.
#[derive(Debug, Clone, Copy, Default)]
pub struct WithholdingAttestor;

impl DaAttestor for WithholdingAttestor {
    fn attest(
        &self,
        _domain_id: &DomainId,
        _da_commit: &[u8; 32],
        _commitments: &[Commitment],
    ) -> bool {
        false
    }
}

/// Publishes DA commitments through a [`DaAttestor`].
pub struct DaPublisher<A> {
    attestor: A,
}

impl<A: DaAttestor> DaPublisher<A> {
    pub fn new(attestor: A) -> Self {
        Self { attestor }
    }

    /// Compute, record, and attest the DA commitment of `domain`.
    ///
    /// Publishing an unchanged sequence again yields the same digest.
    ///
    /// # Errors
    /// - `WrongPhase` unless the domain is `Ordered` or `DaPublished`
    /// - `EmptyOrdering` for a domain with nothing ordered
    /// - `ExecutionIncomplete` while outcomes are missing
    /// - `DaWithheld` if the attestor declined; the commit is recorded but
    ///   `da_ready` stays false
    pub fn publish(&self, domain: &mut CausalDomain) -> Result<[u8; 32]> {
        let da_commit = da_commitment(domain.ordered());
        domain.record_da(da_commit, false)?;

        let commitments: Vec<Commitment> =
            domain.ordered().iter().map(|tx| tx.commitment).collect();
        if !self.attestor.attest(domain.id(), &da_commit, &commitments) {
            tracing::warn!(
                domain = %domain.id(),
                da_commit = %hex::encode(da_commit),
                "DA attestation withheld"
            );
            return Err(FinalityError::DaWithheld(domain.id().clone()).into());
        }

        domain.record_da(da_commit, true)?;
        tracing::info!(
            domain = %domain.id(),
            da_commit = %hex::encode(da_commit),
            txs = commitments.len(),
            "DA published"
        );
        Ok(da_commit)
    }
}

/// Whether `domain` is attested available and its recorded commit still
/// matches its ordered sequence.
#[must_use]
pub fn is_available(domain: &CausalDomain) -> bool {
    domain.da_ready()
        && domain
            .da_commit()
            .is_some_and(|commit| verify_da_commitment(domain.ordered(), commit))
}

#[cfg(test)]
mod tests {
    use causeway_types::*;

    use super::*;

    fn executed(n: u8) -> CausalDomain {
        let txs: Vec<Transaction> = (0..n)
            .map(|i| Transaction::dummy(&format!("t{i}"), [i + 1; 32]))
            .collect();
        let mut d = CausalDomain::new(DomainId::from_digest(&[9; 32]));
        for tx in &txs {
            d.push(tx.clone()).unwrap();
        }
        d.install_ordering(txs).unwrap();
        for i in 0..usize::from(n) {
            d.record_outcome(i, TxOutcome::Executed).unwrap();
        }
        d
    }

    #[test]
    fn attested_publication_sets_ready() {
        let mut d = executed(3);
        let commit = DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();

        assert_eq!(commit, da_commitment(d.ordered()));
        assert_eq!(d.da_commit(), Some(&commit));
        assert!(d.da_ready());
        assert_eq!(d.phase(), DomainPhase::DaPublished);
        assert!(is_available(&d));
    }

    #[test]
    fn republish_is_stable() {
        let mut d = executed(2);
        let publisher = DaPublisher::new(LocalAttestor);
        let first = publisher.publish(&mut d).unwrap();
        let second = publisher.publish(&mut d).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn withheld_attestation_keeps_domain_unavailable() {
        let mut d = executed(2);
        let err = DaPublisher::new(WithholdingAttestor)
            .publish(&mut d)
            .unwrap_err();

        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::DaWithheld(_))
        ));
        assert!(d.da_commit().is_some());
        assert!(!d.da_ready());
        assert_eq!(d.phase(), DomainPhase::Ordered);
        assert!(!is_available(&d));

        // A later attested publication recovers.
        DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
        assert!(is_available(&d));
    }

    #[test]
    fn incomplete_execution_blocks_publication() {
        let txs = vec![Transaction::dummy("a", [1; 32]), Transaction::dummy("b", [2; 32])];
        let mut d = CausalDomain::new(DomainId::from_digest(&[9; 32]));
        for tx in &txs {
            d.push(tx.clone()).unwrap();
        }
        d.install_ordering(txs).unwrap();
        d.record_outcome(0, TxOutcome::Executed).unwrap();

        let err = DaPublisher::new(LocalAttestor).publish(&mut d).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Domain(DomainError::ExecutionIncomplete { .. })
        ));
        assert!(d.da_commit().is_none());
    }

    #[test]
    fn unordered_domain_rejected() {
        let mut d = CausalDomain::new(DomainId::from_digest(&[9; 32]));
        d.push(Transaction::dummy("a", [1; 32])).unwrap();
        let err = DaPublisher::new(LocalAttestor).publish(&mut d).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Domain(DomainError::WrongPhase { .. })
        ));
    }

    #[test]
    fn attestor_sees_ordered_commitments() {
        struct Checking;
        impl DaAttestor for Checking {
            fn attest(
                &self,
                _: &DomainId,
                da_commit: &[u8; 32],
                commitments: &[Commitment],
            ) -> bool {
                commitments.len() == 3
                    && commitments[0] == Commitment::new([1; 32])
                    && *da_commit != [0; 32]
            }
        }
        let mut d = executed(3);
        assert!(DaPublisher::new(Checking).publish(&mut d).is_ok());
    }
}
