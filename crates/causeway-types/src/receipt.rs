//! Admission receipts.
//!
//! A [`Receipt`] is the submitter's proof that a transaction was admitted
//! and which causal domain it was routed to. It binds only public data:
//! the transaction id, its commitment, and the derived domain id.

use serde::{Deserialize, Serialize};

use crate::{Commitment, DomainId, TxId};

/// Proof of admission. Produced exactly once per admitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_id: TxId,
    pub commitment: Commitment,
    pub domain_id: DomainId,
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "receipt[{} -> {} @{}]",
            self.tx_id,
            self.domain_id,
            self.commitment.short()
        )
    }
}
