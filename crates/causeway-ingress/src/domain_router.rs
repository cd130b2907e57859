//! Domain router: collects admitted transactions into causal domains.
//!
//! Each receipt names the domain its transaction belongs to; the router
//! appends the transaction to that domain's pending set in arrival order,
//! creating the domain on first use. Domains are handed out whole to the
//! processing side with [`DomainRouter::take`] or [`DomainRouter::drain`],
//! after which that domain id starts from an empty pending set again.

use std::collections::BTreeMap;

use causeway_types::{
    CausalDomain, CausewayError, DomainId, Receipt, Result, Transaction, constants,
};

/// Routes admitted transactions into per-domain pending sets.
pub struct DomainRouter {
    /// Domains in `DomainId` order, so draining is deterministic.
    domains: BTreeMap<DomainId, CausalDomain>,
    /// Capacity of every newly created domain.
    max_pending_per_domain: usize,
}

impl DomainRouter {
    /// Create a router with the default per-domain capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(constants::DEFAULT_MAX_PENDING_PER_DOMAIN)
    }

    /// Create a router whose domains hold at most `max_pending_per_domain`.
    #[must_use]
    pub fn with_capacity(max_pending_per_domain: usize) -> Self {
        Self {
            domains: BTreeMap::new(),
            max_pending_per_domain,
        }
    }

    /// Append an admitted transaction to the domain named by its receipt.
    ///
    /// # Errors
    /// - `Internal` if the receipt was issued for a different transaction
    /// - `DomainFull` when the domain is at capacity
    pub fn route(&mut self, receipt: &Receipt, tx: Transaction) -> Result<()> {
        if receipt.tx_id != tx.id || receipt.commitment != tx.commitment {
            return Err(CausewayError::Internal(format!(
                "receipt for {} does not match transaction {}",
                receipt.tx_id, tx.id
            )));
        }
        let capacity = self.max_pending_per_domain;
        let domain = self
            .domains
            .entry(receipt.domain_id.clone())
            .or_insert_with(|| CausalDomain::with_capacity(receipt.domain_id.clone(), capacity));
        domain.push(tx)?;
        tracing::trace!(
            tx_id = %receipt.tx_id,
            domain = %receipt.domain_id,
            pending = domain.pending().len(),
            "transaction routed"
        );
        Ok(())
    }

    /// Look at a domain without taking it.
    #[must_use]
    pub fn domain(&self, id: &DomainId) -> Option<&CausalDomain> {
        self.domains.get(id)
    }

    /// Remove one domain for processing.
    pub fn take(&mut self, id: &DomainId) -> Option<CausalDomain> {
        self.domains.remove(id)
    }

    /// Remove every domain for processing, in `DomainId` order.
    pub fn drain(&mut self) -> Vec<CausalDomain> {
        std::mem::take(&mut self.domains).into_values().collect()
    }

    /// Hand a domain back, e.g. one whose processing stalled and must resume.
    ///
    /// # Errors
    /// Returns `Internal` if a domain with the same id was opened meanwhile.
    pub fn restore(&mut self, domain: CausalDomain) -> Result<()> {
        if self.domains.contains_key(domain.id()) {
            return Err(CausewayError::Internal(format!(
                "domain {} already open",
                domain.id()
            )));
        }
        self.domains.insert(domain.id().clone(), domain);
        Ok(())
    }

    /// Number of open domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether no domain is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Total pending transactions across all open domains.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.domains.values().map(|d| d.pending().len()).sum()
    }
}

impl Default for DomainRouter {
    fn default() -> Self {
        Self::new()
    }
}
