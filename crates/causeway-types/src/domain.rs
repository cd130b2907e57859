//! Causal domain state machine.
//!
//! A causal domain groups the transactions whose write sets hash to the
//! same [`DomainId`]. It moves through four phases, never backwards:
//! **PENDING → ORDERED → DA_PUBLISHED → FINALIZED**
//!
//! During PENDING, admitted transactions are appended in arrival order.
//! Ordering freezes the pending set and installs a permutation of it.
//! While ORDERED, each ordered transaction is revealed and executed and its
//! outcome recorded at the resume cursor. DA publication requires every
//! outcome to be recorded. Finalization requires DA to be ready.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError, DomainId, ExecutionError, FinalityError, RevealError, Transaction, constants,
    digest,
};

/// The four monotonic phases of a causal domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DomainPhase {
    /// Accepting admitted transactions.
    Pending,
    /// Pending set frozen; ordered sequence installed; execution in progress.
    Ordered,
    /// DA commitment published and attested.
    DaPublished,
    /// Irreversibly final.
    Finalized,
}

impl fmt::Display for DomainPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Ordered => write!(f, "ORDERED"),
            Self::DaPublished => write!(f, "DA_PUBLISHED"),
            Self::Finalized => write!(f, "FINALIZED"),
        }
    }
}

/// Recorded result of processing one ordered transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// The transfer was applied to state.
    Executed,
    /// Plaintext could not be obtained; state untouched.
    RevealFailed(RevealError),
    /// Execution rejected the transaction; state untouched.
    ExecutionFailed(ExecutionError),
}

impl TxOutcome {
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

/// Handle to a transaction at a fixed position of a domain's ordered
/// sequence.
///
/// Only [`CausalDomain`] can mint these, so holding one proves the
/// transaction's ordering position is already fixed. The entry carries the
/// ordering root the domain computed when the sequence was installed, so
/// the position proof cannot be supplied from outside. The reveal path
/// accepts nothing else.
#[derive(Debug, Clone, Copy)]
pub struct OrderedEntry<'a> {
    domain_id: &'a DomainId,
    index: usize,
    tx: &'a Transaction,
    ordering_root: &'a [u8; 32],
}

impl<'a> OrderedEntry<'a> {
    #[must_use]
    pub fn domain_id(&self) -> &'a DomainId {
        self.domain_id
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn transaction(&self) -> &'a Transaction {
        self.tx
    }

    /// Ordering root of the sequence this entry belongs to.
    #[must_use]
    pub fn ordering_root(&self) -> &'a [u8; 32] {
        self.ordering_root
    }
}

/// A shard of transactions sharing a write-set digest.
///
/// Owned exclusively by whoever is processing it; all transitions go
/// through the methods below, which enforce the phase ordering.
#[derive(Debug, Clone)]
pub struct CausalDomain {
    id: DomainId,
    phase: DomainPhase,
    /// Admitted transactions in arrival order.
    pending: Vec<Transaction>,
    /// Deterministic permutation of `pending`; empty until ordering runs.
    ordered: Vec<Transaction>,
    /// Digest of `ordered`, set together with it.
    ordering_root: Option<[u8; 32]>,
    /// One entry per processed ordered index; its length is the resume cursor.
    outcomes: Vec<TxOutcome>,
    da_commit: Option<[u8; 32]>,
    da_ready: bool,
    finalized: bool,
    finalized_height: Option<u64>,
    finalized_at: Option<DateTime<Utc>>,
    capacity: usize,
}

impl CausalDomain {
    /// Create an empty domain with the default pending capacity.
    #[must_use]
    pub fn new(id: DomainId) -> Self {
        Self::with_capacity(id, constants::DEFAULT_MAX_PENDING_PER_DOMAIN)
    }

    /// Create an empty domain holding at most `capacity` pending transactions.
    #[must_use]
    pub fn with_capacity(id: DomainId, capacity: usize) -> Self {
        Self {
            id,
            phase: DomainPhase::Pending,
            pending: Vec::new(),
            ordered: Vec::new(),
            ordering_root: None,
            outcomes: Vec::new(),
            da_commit: None,
            da_ready: false,
            finalized: false,
            finalized_height: None,
            finalized_at: None,
            capacity,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> &DomainId {
        &self.id
    }

    #[must_use]
    pub fn phase(&self) -> DomainPhase {
        self.phase
    }

    #[must_use]
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    #[must_use]
    pub fn ordered(&self) -> &[Transaction] {
        &self.ordered
    }

    /// Root of the installed ordered sequence; `None` before ordering.
    #[must_use]
    pub fn ordering_root(&self) -> Option<&[u8; 32]> {
        self.ordering_root.as_ref()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[TxOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn da_commit(&self) -> Option<&[u8; 32]> {
        self.da_commit.as_ref()
    }

    #[must_use]
    pub fn da_ready(&self) -> bool {
        self.da_ready
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn finalized_height(&self) -> Option<u64> {
        self.finalized_height
    }

    #[must_use]
    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }

    /// Index of the first ordered transaction without a recorded outcome.
    #[must_use]
    pub fn next_unexecuted(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every ordered transaction has a recorded outcome.
    #[must_use]
    pub fn is_fully_executed(&self) -> bool {
        self.phase >= DomainPhase::Ordered && self.outcomes.len() == self.ordered.len()
    }

    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_executed()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.executed_count()
    }

    /// Whether `ordered` holds exactly the transactions of `pending`.
    #[must_use]
    pub fn is_permutation_of_pending(&self) -> bool {
        Self::same_multiset(&self.pending, &self.ordered)
    }

    // -----------------------------------------------------------------
    // PENDING
    // -----------------------------------------------------------------

    /// Append an admitted transaction in arrival order.
    ///
    /// # Errors
    /// - `DomainSealed` once ordering has run
    /// - `DomainFull` at capacity
    pub fn push(&mut self, tx: Transaction) -> Result<(), DomainError> {
        if self.phase != DomainPhase::Pending {
            return Err(DomainError::DomainSealed(self.id.clone()));
        }
        if self.pending.len() >= self.capacity {
            return Err(DomainError::DomainFull {
                domain: self.id.clone(),
                capacity: self.capacity,
            });
        }
        self.pending.push(tx);
        Ok(())
    }

    // -----------------------------------------------------------------
    // ORDERED
    // -----------------------------------------------------------------

    /// Install the ordered sequence and freeze the pending set.
    ///
    /// The ordering root is computed here from the installed sequence.
    /// Re-installing is allowed while ORDERED as long as the sequence is
    /// identical once execution has started.
    ///
    /// # Errors
    /// - `WrongPhase` after DA publication
    /// - `OrderingMismatch` if `ordered` is not a permutation of pending, or
    ///   differs from a sequence that execution already depends on
    pub fn install_ordering(&mut self, ordered: Vec<Transaction>) -> Result<(), DomainError> {
        if self.phase > DomainPhase::Ordered {
            return Err(DomainError::WrongPhase {
                operation: "order",
                actual: self.phase,
            });
        }
        if !Self::same_multiset(&self.pending, &ordered) {
            return Err(DomainError::OrderingMismatch(self.id.clone()));
        }
        if !self.outcomes.is_empty() && ordered != self.ordered {
            return Err(DomainError::OrderingMismatch(self.id.clone()));
        }
        self.ordering_root = Some(digest::ordering_root(&ordered));
        self.ordered = ordered;
        self.phase = DomainPhase::Ordered;
        Ok(())
    }

    /// Handle to the ordered transaction at `index`.
    ///
    /// # Errors
    /// - `WrongPhase` before ordering
    /// - `IndexOutOfRange` past the end of the ordered sequence
    pub fn ordered_entry(&self, index: usize) -> Result<OrderedEntry<'_>, DomainError> {
        let Some(ordering_root) = self.ordering_root.as_ref() else {
            return Err(DomainError::WrongPhase {
                operation: "reveal",
                actual: self.phase,
            });
        };
        let tx = self
            .ordered
            .get(index)
            .ok_or(DomainError::IndexOutOfRange {
                index,
                len: self.ordered.len(),
            })?;
        Ok(OrderedEntry {
            domain_id: &self.id,
            index,
            tx,
            ordering_root,
        })
    }

    /// Handles to every ordered transaction, in order.
    pub fn ordered_entries(&self) -> impl Iterator<Item = OrderedEntry<'_>> {
        self.ordering_root.iter().flat_map(move |ordering_root| {
            self.ordered
                .iter()
                .enumerate()
                .map(move |(index, tx)| OrderedEntry {
                    domain_id: &self.id,
                    index,
                    tx,
                    ordering_root,
                })
        })
    }

    /// Record the outcome of the ordered transaction at the resume cursor.
    ///
    /// # Errors
    /// - `WrongPhase` unless ORDERED
    /// - `OutcomeOutOfSequence` if `index` is not the resume cursor
    /// - `IndexOutOfRange` past the end of the ordered sequence
    pub fn record_outcome(&mut self, index: usize, outcome: TxOutcome) -> Result<(), DomainError> {
        if self.phase != DomainPhase::Ordered {
            return Err(DomainError::WrongPhase {
                operation: "record outcome",
                actual: self.phase,
            });
        }
        if index >= self.ordered.len() {
            return Err(DomainError::IndexOutOfRange {
                index,
                len: self.ordered.len(),
            });
        }
        if index != self.outcomes.len() {
            return Err(DomainError::OutcomeOutOfSequence {
                expected: self.outcomes.len(),
                actual: index,
            });
        }
        self.outcomes.push(outcome);
        Ok(())
    }

    // -----------------------------------------------------------------
    // DA_PUBLISHED
    // -----------------------------------------------------------------

    /// Record the DA commitment over the ordered sequence.
    ///
    /// `attested` is the DA network's verdict. Readiness, once granted,
    /// is kept.
    ///
    /// # Errors
    /// - `WrongPhase` before ordering or after finalization
    /// - `EmptyOrdering` if nothing was ordered
    /// - `ExecutionIncomplete` while outcomes are missing
    pub fn record_da(&mut self, da_commit: [u8; 32], attested: bool) -> Result<(), DomainError> {
        if !matches!(self.phase, DomainPhase::Ordered | DomainPhase::DaPublished) {
            return Err(DomainError::WrongPhase {
                operation: "publish DA",
                actual: self.phase,
            });
        }
        if self.ordered.is_empty() {
            return Err(DomainError::EmptyOrdering(self.id.clone()));
        }
        if !self.is_fully_executed() {
            return Err(DomainError::ExecutionIncomplete {
                domain: self.id.clone(),
                executed: self.outcomes.len(),
                ordered: self.ordered.len(),
            });
        }
        self.da_commit = Some(da_commit);
        if attested {
            self.da_ready = true;
            self.phase = DomainPhase::DaPublished;
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // FINALIZED
    // -----------------------------------------------------------------

    /// Mark the domain final at `height`.
    ///
    /// # Errors
    /// - `AlreadyFinalized` if already final
    /// - `DaUnavailable` unless DA is ready; the domain is left untouched
    pub fn finalize(&mut self, height: u64, at: DateTime<Utc>) -> Result<(), FinalityError> {
        if self.finalized {
            return Err(FinalityError::AlreadyFinalized(self.id.clone()));
        }
        if !self.da_ready {
            return Err(FinalityError::DaUnavailable(self.id.clone()));
        }
        self.finalized = true;
        self.finalized_height = Some(height);
        self.finalized_at = Some(at);
        self.phase = DomainPhase::Finalized;
        Ok(())
    }

    fn same_multiset(a: &[Transaction], b: &[Transaction]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let key = |tx: &Transaction| (tx.id.clone(), tx.commitment);
        let mut left: Vec<_> = a.iter().map(key).collect();
        let mut right: Vec<_> = b.iter().map(key).collect();
        left.sort();
        right.sort();
        left == right
    }
}
