//! One causal domain through order → reveal + execute → DA → finality.
//!
//! Stages run strictly in sequence for a domain. Execution walks the
//! ordered sequence from the domain's `next_unexecuted` cursor and records
//! exactly one outcome per index, so a run interrupted by a stalled reveal
//! or a lost version race can be repeated without executing anything twice.

use std::sync::Arc;

use causeway_execution::{ExecutionEngine, RevealAdapter, RevealService, StateStore};
use causeway_finality::{DaAttestor, DaPublisher, FinalityGate, FinalityRecord};
use causeway_ordering::order_domain;
use causeway_types::{
    CausalDomain, CausewayConfig, CausewayError, DomainError, DomainId, DomainPhase,
    ExecutionError, FailurePolicy, RevealError, TxOutcome,
};
use parking_lot::Mutex;
use thiserror::Error;

/// Why a pipeline run stopped before finality.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Causeway(#[from] CausewayError),

    /// The reveal service did not answer in time; the domain can be re-run.
    #[error("CW_ERR_600: Reveal stalled in {domain} at index {index}: {source}")]
    RevealStalled {
        domain: DomainId,
        index: usize,
        source: RevealError,
    },

    /// A transaction failed under `FailurePolicy::HaltDomain`.
    #[error("CW_ERR_601: Execution halted in {domain} at index {index}")]
    ExecutionHalted { domain: DomainId, index: usize },

    /// Execution kept losing version races with other domains; the domain
    /// can be re-run.
    #[error("CW_ERR_602: Execution contended in {domain} at index {index}: {source}")]
    ExecutionContended {
        domain: DomainId,
        index: usize,
        source: ExecutionError,
    },
}

impl From<DomainError> for PipelineError {
    fn from(err: DomainError) -> Self {
        Self::Causeway(err.into())
    }
}

/// Shared, stateless-per-domain stage runner.
pub struct DomainPipeline {
    reveal: RevealAdapter<Arc<dyn RevealService>>,
    engine: ExecutionEngine,
    store: Arc<dyn StateStore>,
    publisher: DaPublisher<Arc<dyn DaAttestor>>,
    gate: Mutex<FinalityGate>,
    failure_policy: FailurePolicy,
}

impl DomainPipeline {
    pub fn new(
        config: &CausewayConfig,
        store: Arc<dyn StateStore>,
        reveal: Arc<dyn RevealService>,
        attestor: Arc<dyn DaAttestor>,
    ) -> Self {
        Self {
            reveal: RevealAdapter::with_timeout(reveal, config.pipeline.reveal_timeout),
            engine: ExecutionEngine::with_retries(config.store.max_commit_retries),
            store,
            publisher: DaPublisher::new(attestor),
            gate: Mutex::new(FinalityGate::new()),
            failure_policy: config.pipeline.failure_policy,
        }
    }

    /// Run every remaining stage for `domain` and finalize it at `height`.
    ///
    /// # Errors
    /// - `RevealStalled` on a reveal timeout; the cursor is left in place
    /// - `ExecutionContended` when commits keep losing version races; the
    ///   cursor is left in place
    /// - `ExecutionHalted` under `HaltDomain` once any outcome failed
    /// - `Causeway` for ordering, DA and finality refusals (`DaWithheld`,
    ///   `NonMonotonicHeight`, ...); the domain keeps its progress
    pub async fn run(
        &self,
        domain: &mut CausalDomain,
        height: u64,
    ) -> Result<FinalityRecord, PipelineError> {
        if domain.phase() < DomainPhase::DaPublished {
            self.order(domain)?;
            self.execute(domain).await?;
            self.publisher.publish(domain)?;
        }
        Ok(self.gate.lock().finalize(domain, height)?)
    }

    /// Fix the execution order of `domain`. Repeating it is a no-op.
    pub fn order(&self, domain: &mut CausalDomain) -> Result<(), PipelineError> {
        order_domain(domain)?;
        Ok(())
    }

    /// Reveal and execute every ordered transaction without an outcome.
    ///
    /// Failed transactions get a failure outcome and, under
    /// `FailurePolicy::Continue`, do not stop the rest of the domain.
    /// Transient failures (reveal timeout, lost version races) record
    /// nothing and stop the run at the cursor.
    pub async fn execute(&self, domain: &mut CausalDomain) -> Result<(), PipelineError> {
        if self.failure_policy == FailurePolicy::HaltDomain {
            if let Some(index) = domain.outcomes().iter().position(|o| !o.is_executed()) {
                return Err(PipelineError::ExecutionHalted {
                    domain: domain.id().clone(),
                    index,
                });
            }
        }

        while !domain.is_fully_executed() {
            let index = domain.next_unexecuted();
            let revealed = self.reveal.reveal(domain.ordered_entry(index)?).await;

            let outcome = match revealed {
                Ok(plaintext) => {
                    let tx = &domain.ordered()[index];
                    match self.engine.execute(tx, &plaintext, self.store.as_ref()) {
                        Ok(_) => TxOutcome::Executed,
                        Err(err) if err.is_transient() => {
                            tracing::info!(
                                tx_id = %tx.id,
                                index,
                                error = %err,
                                "execution contended"
                            );
                            return Err(PipelineError::ExecutionContended {
                                domain: domain.id().clone(),
                                index,
                                source: err,
                            });
                        }
                        Err(err) => {
                            tracing::warn!(tx_id = %tx.id, index, error = %err, "execution failed");
                            TxOutcome::ExecutionFailed(err)
                        }
                    }
                }
                Err(err) if err.is_transient() => {
                    return Err(PipelineError::RevealStalled {
                        domain: domain.id().clone(),
                        index,
                        source: err,
                    });
                }
                Err(err) => {
                    tracing::warn!(domain = %domain.id(), index, error = %err, "reveal failed");
                    TxOutcome::RevealFailed(err)
                }
            };

            let failed = !outcome.is_executed();
            domain.record_outcome(index, outcome)?;
            if failed && self.failure_policy == FailurePolicy::HaltDomain {
                return Err(PipelineError::ExecutionHalted {
                    domain: domain.id().clone(),
                    index,
                });
            }
        }

        tracing::debug!(
            domain = %domain.id(),
            executed = domain.executed_count(),
            failed = domain.failed_count(),
            "domain executed"
        );
        Ok(())
    }
}
