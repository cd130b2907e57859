//! Commitment-based ordering engine.
//!
//! ```text
//! order_domain(CausalDomain.pending) -> CausalDomain.ordered
//! ```
//!
//! Transactions are sorted ascending by commitment bytes, which is the same
//! order as their lowercase hex encoding. Two transactions with the same
//! commitment are ordered by `TxId`. Nothing else about a transaction is
//! consulted, so there is no way to buy or arrive into a better slot.

use std::cmp::Ordering;

use causeway_types::{CausalDomain, Result, Transaction};

/// Total order used by the ordering engine: commitment, then `TxId`.
#[must_use]
pub fn compare_for_ordering(a: &Transaction, b: &Transaction) -> Ordering {
    a.commitment
        .as_bytes()
        .cmp(b.commitment.as_bytes())
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort a copy of `pending` into execution order.
#[must_use]
pub fn order_transactions(pending: &[Transaction]) -> Vec<Transaction> {
    let mut ordered = pending.to_vec();
    ordered.sort_by(compare_for_ordering);
    ordered
}

/// Fix the execution order of a domain.
///
/// Idempotent: re-running on an unchanged pending set installs the same
/// sequence.
///
/// # Errors
/// `WrongPhase` once the domain's DA commitment has been published.
pub fn order_domain(domain: &mut CausalDomain) -> Result<()> {
    let ordered = order_transactions(domain.pending());
    domain.install_ordering(ordered)?;
    tracing::debug!(
        domain = %domain.id(),
        count = domain.ordered().len(),
        "domain ordered"
    );
    Ok(())
}
