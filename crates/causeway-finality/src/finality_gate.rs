//! Finality gate: no finality without DA.
//!
//! A domain is finalized at most once, and only after its DA commitment was
//! attested. A refused finalization leaves the domain untouched, so the
//! caller may publish again and retry.

use causeway_types::{CausalDomain, DomainId, FinalityError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one finalized domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityRecord {
    pub domain_id: DomainId,
    pub height: u64,
    pub da_commit: [u8; 32],
    pub executed: usize,
    pub failed: usize,
    pub finalized_at: DateTime<Utc>,
}

impl FinalityRecord {
    #[must_use]
    pub fn da_commit_hex(&self) -> String {
        hex::encode(self.da_commit)
    }
}

/// Issues finality for DA-ready domains at non-decreasing heights.
#[derive(Debug, Default)]
pub struct FinalityGate {
    last_height: Option<u64>,
    finalized: u64,
}

impl FinalityGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize `domain` at `height`.
    ///
    /// # Errors
    /// - `NonMonotonicHeight` if `height` is below a height already issued
    /// - `AlreadyFinalized` if the domain is final
    /// - `DaUnavailable` if the domain is not `da_ready`
    pub fn finalize(&mut self, domain: &mut CausalDomain, height: u64) -> Result<FinalityRecord> {
        if let Some(last) = self.last_height {
            if height < last {
                return Err(FinalityError::NonMonotonicHeight {
                    requested: height,
                    last,
                }
                .into());
            }
        }
        let Some(da_commit) = domain.da_commit().copied() else {
            return Err(FinalityError::DaUnavailable(domain.id().clone()).into());
        };

        let finalized_at = Utc::now();
        if let Err(err) = domain.finalize(height, finalized_at) {
            tracing::warn!(domain = %domain.id(), height, error = %err, "finality refused");
            return Err(err.into());
        }

        self.last_height = Some(height);
        self.finalized += 1;

        let record = FinalityRecord {
            domain_id: domain.id().clone(),
            height,
            da_commit,
            executed: domain.executed_count(),
            failed: domain.failed_count(),
            finalized_at,
        };
        tracing::info!(
            domain = %record.domain_id,
            height,
            executed = record.executed,
            failed = record.failed,
            "domain finalized"
        );
        Ok(record)
    }

    /// Highest height issued so far.
    #[must_use]
    pub fn last_height(&self) -> Option<u64> {
        self.last_height
    }

    /// Number of domains finalized through this gate.
    #[must_use]
    pub fn finalized_count(&self) -> u64 {
        self.finalized
    }
}

#[cfg(test)]
mod tests {
    use causeway_types::*;

    use super::*;
    use crate::{DaPublisher, LocalAttestor, WithholdingAttestor};

    fn executed(seed: u8) -> CausalDomain {
        let txs = vec![
            Transaction::dummy("a", [seed; 32]),
            Transaction::dummy("b", [seed.wrapping_add(1); 32]),
        ];
        let mut d = CausalDomain::new(DomainId::from_digest(&[seed; 32]));
        for tx in &txs {
            d.push(tx.clone()).unwrap();
        }
        d.install_ordering(txs).unwrap();
        d.record_outcome(0, TxOutcome::Executed).unwrap();
        d.record_outcome(1, TxOutcome::RevealFailed(RevealError::EmptyCiphertext))
            .unwrap();
        d
    }

    #[test]
    fn finalizes_published_domain() {
        let mut d = executed(1);
        let commit = DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
        let mut gate = FinalityGate::new();
        let record = gate.finalize(&mut d, 10).unwrap();

        assert_eq!(record.height, 10);
        assert_eq!(record.da_commit, commit);
        assert_eq!(record.executed, 1);
        assert_eq!(record.failed, 1);
        assert_eq!(&record.domain_id, d.id());
        assert_eq!(record.da_commit_hex().len(), 64);
        assert!(d.is_finalized());
        assert_eq!(d.finalized_height(), Some(10));
        assert_eq!(d.finalized_at(), Some(record.finalized_at));
        assert_eq!(gate.last_height(), Some(10));
    }

    #[test]
    fn unpublished_domain_refused() {
        let mut d = executed(1);
        let err = FinalityGate::new().finalize(&mut d, 1).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::DaUnavailable(_))
        ));
        assert!(!d.is_finalized());
        assert_eq!(d.phase(), DomainPhase::Ordered);
    }

    #[test]
    fn withheld_domain_refused_then_retried() {
        let mut d = executed(1);
        let mut gate = FinalityGate::new();
        assert!(DaPublisher::new(WithholdingAttestor).publish(&mut d).is_err());

        let err = gate.finalize(&mut d, 1).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::DaUnavailable(_))
        ));
        assert!(!d.is_finalized());
        assert_eq!(gate.last_height(), None);

        DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
        assert!(gate.finalize(&mut d, 1).is_ok());
    }

    #[test]
    fn second_finalization_refused() {
        let mut d = executed(1);
        DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
        let mut gate = FinalityGate::new();
        gate.finalize(&mut d, 5).unwrap();
        let err = gate.finalize(&mut d, 6).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::AlreadyFinalized(_))
        ));
        assert_eq!(d.finalized_height(), Some(5));
        assert_eq!(gate.finalized_count(), 1);
    }

    #[test]
    fn heights_never_go_backwards() {
        let mut gate = FinalityGate::new();
        let mut a = executed(1);
        let mut b = executed(10);
        let mut c = executed(20);
        for d in [&mut a, &mut b, &mut c] {
            DaPublisher::new(LocalAttestor).publish(d).unwrap();
        }

        gate.finalize(&mut a, 7).unwrap();
        gate.finalize(&mut b, 7).unwrap();
        let err = gate.finalize(&mut c, 6).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::NonMonotonicHeight {
                requested: 6,
                last: 7
            })
        ));
        assert!(!c.is_finalized());
    }

    #[test]
    fn record_serializes() {
        let mut d = executed(1);
        DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
        let record = FinalityGate::new().finalize(&mut d, 3).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: FinalityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
