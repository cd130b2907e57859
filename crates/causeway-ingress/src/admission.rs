//! Admission validator, the security boundary of the pipeline.
//!
//! Every submitted transaction passes through [`AdmissionValidator::admit`]
//! before it can join a causal domain.
//!
//! ## Design Principles
//!
//! - **Ciphertext-blind**: only the declared sets, fee envelope, id and
//!   commitment are read; plaintext never crosses this boundary
//! - **Fail-closed**: the first failed check rejects the submission
//! - **No side effects on rejection**: no receipt, no domain state

use causeway_types::{AdmissionError, DeclaredSet, Receipt, Transaction};

use crate::domain_assigner::assign_domain;

/// Running counts of admission decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionStats {
    pub admitted: u64,
    pub rejected: u64,
}

/// Hard gate that validates submissions and issues receipts.
#[derive(Debug, Default)]
pub struct AdmissionValidator {
    stats: AdmissionStats,
}

impl AdmissionValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a submission and issue its receipt.
    ///
    /// Checks, in order: non-empty read set, non-empty write set,
    /// `max_fee > 0`. On success the receipt binds the transaction id,
    /// its commitment and the domain derived from the write set.
    ///
    /// # Errors
    /// - `MissingSets` naming the empty set
    /// - `MissingFee` for a zero max fee
    pub fn admit(&mut self, tx: &Transaction) -> Result<Receipt, AdmissionError> {
        match Self::check(tx) {
            Ok(()) => {
                let receipt = Receipt {
                    tx_id: tx.id.clone(),
                    commitment: tx.commitment,
                    domain_id: assign_domain(&tx.write_set),
                };
                self.stats.admitted += 1;
                tracing::debug!(
                    tx_id = %receipt.tx_id,
                    domain = %receipt.domain_id,
                    commitment = %receipt.commitment.short(),
                    "transaction admitted"
                );
                Ok(receipt)
            }
            Err(err) => {
                self.stats.rejected += 1;
                tracing::warn!(tx_id = %tx.id, error = %err, "transaction rejected at admission");
                Err(err)
            }
        }
    }

    /// Admission decisions so far.
    #[must_use]
    pub fn stats(&self) -> AdmissionStats {
        self.stats
    }

    fn check(tx: &Transaction) -> Result<(), AdmissionError> {
        if tx.read_set.is_empty() {
            return Err(AdmissionError::MissingSets {
                which: DeclaredSet::Read,
            });
        }
        if tx.write_set.is_empty() {
            return Err(AdmissionError::MissingSets {
                which: DeclaredSet::Write,
            });
        }
        if tx.fee.max_fee == 0 {
            return Err(AdmissionError::MissingFee);
        }
        Ok(())
    }
}
