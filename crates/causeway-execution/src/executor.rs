//! Deterministic execution of revealed transfers.
//!
//! One call executes one transaction:
//! 1. Decode the plaintext as a [`TransferInstruction`]
//! 2. Require both accounts in the declared write set
//! 3. Require both accounts to exist
//! 4. Require `source.balance >= amount`
//! 5. Commit debit + credit with both versions bumped, as one versioned write
//!
//! Step 5 is retried from step 3 on a version conflict, so executions from
//! different domains touching the same object serialize on that object.
//! Any error leaves the store exactly as it was.

use causeway_types::{
    ExecutionError, ObjectId, StateObject, Transaction, VersionedWrite, constants,
};

use crate::{
    payload::TransferInstruction,
    state_store::{StateStore, StoreError},
};

/// Post-state of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEffect {
    pub source: StateObject,
    pub destination: StateObject,
}

/// Applies revealed transfers to a [`StateStore`].
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    max_commit_retries: u32,
}

impl ExecutionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_retries(constants::DEFAULT_MAX_COMMIT_RETRIES)
    }

    /// Engine giving up after `max_commit_retries` lost version races.
    #[must_use]
    pub fn with_retries(max_commit_retries: u32) -> Self {
        Self {
            max_commit_retries: max_commit_retries.max(1),
        }
    }

    /// Execute `tx` whose revealed payload is `plaintext`.
    ///
    /// # Errors
    /// - `MalformedPayload` if the plaintext is not a valid transfer
    /// - `WriteSetMismatch` if either account is outside `tx.write_set`
    /// - `UnknownObject` if either account does not exist
    /// - `InsufficientFunds` if the source cannot cover the amount
    /// - `BalanceOverflow` if the destination cannot hold the credit
    /// - `ConcurrentModification` after too many version conflicts
    pub fn execute<S: StateStore + ?Sized>(
        &self,
        tx: &Transaction,
        plaintext: &[u8],
        store: &S,
    ) -> Result<TransferEffect, ExecutionError> {
        let transfer = TransferInstruction::decode(plaintext)?;
        let source_id = transfer.source();
        let destination_id = transfer.destination();

        for id in [&source_id, &destination_id] {
            if !tx.writes(id) {
                return Err(ExecutionError::WriteSetMismatch(id.clone()));
            }
        }

        for _ in 0..self.max_commit_retries {
            let source = Self::load(store, &source_id)?;
            let destination = Self::load(store, &destination_id)?;

            if source.balance < transfer.amount {
                return Err(ExecutionError::InsufficientFunds {
                    needed: transfer.amount,
                    available: source.balance,
                });
            }
            let credited = destination
                .balance
                .checked_add(transfer.amount)
                .ok_or_else(|| ExecutionError::BalanceOverflow(destination_id.clone()))?;

            let effect = TransferEffect {
                source: source.with_balance(source.balance - transfer.amount),
                destination: destination.with_balance(credited),
            };
            let writes = [
                VersionedWrite::replacing(&source, effect.source.clone()),
                VersionedWrite::replacing(&destination, effect.destination.clone()),
            ];

            match store.commit(&writes) {
                Ok(()) => return Ok(effect),
                Err(StoreError::UnknownObject(id)) => {
                    return Err(ExecutionError::UnknownObject(id));
                }
                Err(StoreError::VersionConflict { object, .. }) => {
                    tracing::debug!(tx_id = %tx.id, %object, "version conflict, retrying");
                }
            }
        }

        Err(ExecutionError::ConcurrentModification {
            attempts: self.max_commit_retries,
        })
    }

    fn load<S: StateStore + ?Sized>(
        store: &S,
        id: &ObjectId,
    ) -> Result<StateObject, ExecutionError> {
        store
            .get(id)
            .ok_or_else(|| ExecutionError::UnknownObject(id.clone()))
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}
