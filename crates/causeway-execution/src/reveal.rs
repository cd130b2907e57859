//! Reveal adapter: plaintext only after ordering is fixed.
//!
//! The real reveal primitive is a threshold-decryption quorum that releases
//! plaintext only for transactions whose position is already committed.
//! Here it sits behind the [`RevealService`] trait, and the adapter only
//! accepts an [`OrderedEntry`], which nothing but an ordered
//! `CausalDomain` can produce. The ordering root in the request comes from
//! that entry as well. There is no way to ask for plaintext of a merely
//! pending transaction, or to attach a position proof of your own.
//!
//! The adapter enforces a per-call timeout. A timed-out reveal is reported
//! as [`RevealError::Timeout`], which callers treat as transient.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use causeway_types::{Commitment, DomainId, OrderedEntry, RevealError, constants};

/// Proof handed to the reveal service that a transaction's slot is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPosition {
    pub domain_id: DomainId,
    pub index: usize,
    /// Digest over the domain's full ordered sequence.
    pub ordering_root: [u8; 32],
}

/// Everything the reveal service gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRequest {
    pub commitment: Commitment,
    pub ciphertext: Vec<u8>,
    pub position: OrderPosition,
}

/// External decryption capability.
#[async_trait]
pub trait RevealService: Send + Sync {
    /// Release the plaintext behind `request.commitment`, or decline.
    async fn reveal(&self, request: RevealRequest) -> Result<Vec<u8>, RevealError>;
}

#[async_trait]
impl<T: RevealService + ?Sized> RevealService for Arc<T> {
    async fn reveal(&self, request: RevealRequest) -> Result<Vec<u8>, RevealError> {
        (**self).reveal(request).await
    }
}

/// Stand-in service whose ciphertext is the plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRevealer;

#[async_trait]
impl RevealService for PassthroughRevealer {
    async fn reveal(&self, request: RevealRequest) -> Result<Vec<u8>, RevealError> {
        Ok(request.ciphertext)
    }
}

/// Service that refuses every request.
#[derive(Debug, Clone)]
pub struct DecliningRevealer {
    pub reason: String,
}

#[async_trait]
impl RevealService for DecliningRevealer {
    async fn reveal(&self, _request: RevealRequest) -> Result<Vec<u8>, RevealError> {
        Err(RevealError::ServiceDeclined {
            reason: self.reason.clone(),
        })
    }
}

/// Bounds and sequences calls into a [`RevealService`].
pub struct RevealAdapter<S> {
    service: S,
    timeout: Duration,
}

impl<S: RevealService> RevealAdapter<S> {
    /// Wrap `service` with the default timeout.
    #[must_use]
    pub fn new(service: S) -> Self {
        Self::with_timeout(
            service,
            Duration::from_millis(constants::DEFAULT_REVEAL_TIMEOUT_MS),
        )
    }

    #[must_use]
    pub fn with_timeout(service: S, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Reveal the plaintext of an ordered transaction.
    ///
    /// # Errors
    /// - `EmptyCiphertext` without calling the service
    /// - `ServiceDeclined` as reported by the service
    /// - `Timeout` if the service does not answer within the timeout
    pub async fn reveal(&self, entry: OrderedEntry<'_>) -> Result<Vec<u8>, RevealError> {
        let tx = entry.transaction();
        if tx.ciphertext.is_empty() {
            return Err(RevealError::EmptyCiphertext);
        }
        let request = RevealRequest {
            commitment: tx.commitment,
            ciphertext: tx.ciphertext.clone(),
            position: OrderPosition {
                domain_id: entry.domain_id().clone(),
                index: entry.index(),
                ordering_root: *entry.ordering_root(),
            },
        };

        match tokio::time::timeout(self.timeout, self.service.reveal(request)).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(
                    tx_id = %tx.id,
                    index = entry.index(),
                    after_ms,
                    "reveal timed out"
                );
                Err(RevealError::Timeout { after_ms })
            }
        }
    }
}
