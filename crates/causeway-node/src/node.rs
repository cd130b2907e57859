//! Node: admission front door plus concurrent per-domain processing.

use std::sync::Arc;

use causeway_execution::{RevealService, StateStore};
use causeway_finality::{DaAttestor, FinalityRecord};
use causeway_ingress::{AdmissionStats, AdmissionValidator, DomainRouter};
use causeway_types::{
    CausalDomain, CausewayConfig, CausewayError, DomainId, Receipt, Result, Transaction,
};
use tokio::task::JoinSet;

use crate::pipeline::{DomainPipeline, PipelineError};

/// Result of one [`Node::process_all`] round.
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Domains finalized this round, in `DomainId` order.
    pub finalized: Vec<FinalityRecord>,
    /// Domains that stopped early and were put back for a later round.
    pub deferred: Vec<(DomainId, PipelineError)>,
    /// Domains halted by a failed transaction under
    /// `FailurePolicy::HaltDomain`. They are dropped from the router, so
    /// their write-set accepts new submissions in a fresh domain. The
    /// domain is returned as it stood, with its recorded outcomes.
    pub halted: Vec<CausalDomain>,
}

/// A single Causeway node.
pub struct Node {
    admission: AdmissionValidator,
    router: DomainRouter,
    store: Arc<dyn StateStore>,
    pipeline: Arc<DomainPipeline>,
}

impl Node {
    /// Build a node from a validated configuration.
    pub fn new(
        config: &CausewayConfig,
        store: Arc<dyn StateStore>,
        reveal: Arc<dyn RevealService>,
        attestor: Arc<dyn DaAttestor>,
    ) -> Result<Self> {
        config.validate()?;
        let pipeline = DomainPipeline::new(config, Arc::clone(&store), reveal, attestor);
        Ok(Self {
            admission: AdmissionValidator::new(),
            router: DomainRouter::with_capacity(config.pipeline.max_pending_per_domain),
            store,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Admit a transaction and route it to its causal domain.
    ///
    /// # Errors
    /// - `Admission` if validation fails (nothing is routed)
    /// - `Domain` if the target domain is sealed or full
    pub fn submit(&mut self, tx: Transaction) -> Result<Receipt> {
        let receipt = self.admission.admit(&tx)?;
        self.router.route(&receipt, tx)?;
        Ok(receipt)
    }

    /// Process every open domain, each on its own task, finalizing at
    /// `height`.
    ///
    /// Domains that cannot finish this round yet (stalled reveal, contended
    /// execution, withheld DA) are returned to the router with their
    /// progress and reported in [`ProcessReport::deferred`]. A halted
    /// domain can never finish, so it leaves the router and is reported in
    /// [`ProcessReport::halted`].
    ///
    /// # Errors
    /// `Internal` if a processing task panicked; its domain is lost.
    pub async fn process_all(&mut self, height: u64) -> Result<ProcessReport> {
        let mut tasks: JoinSet<(CausalDomain, Result<FinalityRecord, PipelineError>)> =
            JoinSet::new();
        for mut domain in self.router.drain() {
            let pipeline = Arc::clone(&self.pipeline);
            tasks.spawn(async move {
                let outcome = pipeline.run(&mut domain, height).await;
                (domain, outcome)
            });
        }

        let mut report = ProcessReport::default();
        let mut panicked = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(record))) => report.finalized.push(record),
                Ok((domain, Err(err @ PipelineError::ExecutionHalted { .. }))) => {
                    tracing::warn!(domain = %domain.id(), error = %err, "domain halted");
                    report.halted.push(domain);
                }
                Ok((domain, Err(err))) => {
                    tracing::info!(domain = %domain.id(), error = %err, "domain deferred");
                    report.deferred.push((domain.id().clone(), err));
                    self.router.restore(domain)?;
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "domain task failed");
                    panicked = Some(join_err.to_string());
                }
            }
        }

        report.finalized.sort_by(|a, b| a.domain_id.cmp(&b.domain_id));
        report.deferred.sort_by(|a, b| a.0.cmp(&b.0));
        report.halted.sort_by(|a, b| a.id().cmp(b.id()));
        tracing::info!(
            height,
            finalized = report.finalized.len(),
            deferred = report.deferred.len(),
            halted = report.halted.len(),
            "processing round complete"
        );

        match panicked {
            Some(msg) => Err(CausewayError::Internal(format!("domain task panicked: {msg}"))),
            None => Ok(report),
        }
    }

    /// Domains waiting for processing.
    #[must_use]
    pub fn router(&self) -> &DomainRouter {
        &self.router
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    #[must_use]
    pub fn admission_stats(&self) -> AdmissionStats {
        self.admission.stats()
    }
}
