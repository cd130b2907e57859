//! Configuration types for Causeway nodes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CausewayError, Result, constants};

/// What the pipeline does when an ordered transaction fails to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep executing the rest of the domain.
    #[default]
    Continue,
    /// Stop at the first failure; the domain never reaches DA publication.
    HaltDomain,
}

/// Per-domain pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on one reveal round-trip.
    pub reveal_timeout: Duration,
    /// Maximum pending transactions per causal domain.
    pub max_pending_per_domain: usize,
    /// Behaviour on per-transaction execution failure.
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reveal_timeout: Duration::from_millis(constants::DEFAULT_REVEAL_TIMEOUT_MS),
            max_pending_per_domain: constants::DEFAULT_MAX_PENDING_PER_DOMAIN,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

/// State store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Optimistic commit retries before giving up on a version race.
    pub max_commit_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: constants::DEFAULT_MAX_COMMIT_RETRIES,
        }
    }
}

/// Top-level node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CausewayConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl CausewayConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.reveal_timeout.is_zero() {
            return Err(CausewayError::Configuration(
                "pipeline.reveal_timeout must be > 0".to_string(),
            ));
        }
        if self.pipeline.max_pending_per_domain == 0 {
            return Err(CausewayError::Configuration(
                "pipeline.max_pending_per_domain must be > 0".to_string(),
            ));
        }
        if self.store.max_commit_retries == 0 {
            return Err(CausewayError::Configuration(
                "store.max_commit_retries must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
