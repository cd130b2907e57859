//! Error types for the Causeway pipeline.
//!
//! All errors use the `CW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by pipeline stage:
//! - 1xx: Admission errors
//! - 2xx: Causal domain / phase errors
//! - 3xx: Reveal errors
//! - 4xx: Execution errors
//! - 5xx: Data availability / finality errors
//! - 9xx: General / internal errors
//!
//! Each stage has its own enum so callers can match on exactly the failures
//! that stage can produce; [`CausewayError`] wraps them all.

use thiserror::Error;

use crate::{DomainId, DomainPhase, ObjectId};

// =================================================================
// Admission Errors (1xx)
// =================================================================

/// Which declared set was missing on a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredSet {
    Read,
    Write,
}

impl std::fmt::Display for DeclaredSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read set"),
            Self::Write => write!(f, "write set"),
        }
    }
}

/// Structural rejection at the admission boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The read set or write set is empty.
    #[error("CW_ERR_100: Missing declared {which}")]
    MissingSets { which: DeclaredSet },

    /// The fee envelope carries a zero max fee.
    #[error("CW_ERR_101: Fee envelope missing (max fee must be > 0)")]
    MissingFee,
}

// =================================================================
// Domain Errors (2xx)
// =================================================================

/// Illegal operation on a causal domain's state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An operation was attempted in the wrong phase.
    #[error("CW_ERR_200: Wrong domain phase for {operation}: domain is {actual}")]
    WrongPhase {
        operation: &'static str,
        actual: DomainPhase,
    },

    /// The pending set has been frozen by ordering.
    #[error("CW_ERR_201: Domain {0} is sealed, no more transactions accepted")]
    DomainSealed(DomainId),

    /// The pending set is at capacity.
    #[error("CW_ERR_202: Domain {domain} full ({capacity} pending)")]
    DomainFull { domain: DomainId, capacity: usize },

    /// DA publication was requested over an empty ordered sequence.
    #[error("CW_ERR_203: Domain {0} has no ordered transactions")]
    EmptyOrdering(DomainId),

    /// DA publication was requested before every ordered transaction
    /// had an outcome.
    #[error("CW_ERR_204: Domain {domain} executed {executed} of {ordered} ordered transactions")]
    ExecutionIncomplete {
        domain: DomainId,
        executed: usize,
        ordered: usize,
    },

    /// An ordered index outside the ordered sequence.
    #[error("CW_ERR_205: Ordered index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// An outcome was recorded for an index other than the resume cursor.
    #[error("CW_ERR_206: Outcome out of sequence: expected index {expected}, got {actual}")]
    OutcomeOutOfSequence { expected: usize, actual: usize },

    /// A proposed ordering is not a permutation of the pending set, or
    /// would change a sequence that execution already depends on.
    #[error("CW_ERR_207: Ordering mismatch for domain {0}")]
    OrderingMismatch(DomainId),
}

// =================================================================
// Reveal Errors (3xx)
// =================================================================

/// Failure to obtain plaintext for an ordered transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// The transaction carries no ciphertext.
    #[error("CW_ERR_300: Empty ciphertext")]
    EmptyCiphertext,

    /// The reveal service refused to release plaintext.
    #[error("CW_ERR_301: Reveal service declined: {reason}")]
    ServiceDeclined { reason: String },

    /// The reveal service did not answer in time.
    #[error("CW_ERR_302: Reveal timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl RevealError {
    /// Whether retrying the same reveal later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// =================================================================
// Execution Errors (4xx)
// =================================================================

/// Per-transaction execution failure. Never leaves a partial transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The revealed payload does not decode as a transfer instruction.
    #[error("CW_ERR_400: Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// The transfer touches an object outside the declared write set.
    #[error("CW_ERR_401: Write set does not cover payload object {0}")]
    WriteSetMismatch(ObjectId),

    /// The transfer references an object absent from the state store.
    #[error("CW_ERR_402: Unknown object: {0}")]
    UnknownObject(ObjectId),

    /// The source balance is lower than the transfer amount.
    #[error("CW_ERR_403: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Crediting the destination would overflow its balance.
    #[error("CW_ERR_404: Balance overflow on {0}")]
    BalanceOverflow(ObjectId),

    /// Optimistic commit kept losing version races.
    #[error("CW_ERR_405: Concurrent modification: gave up after {attempts} attempts")]
    ConcurrentModification { attempts: u32 },
}

impl ExecutionError {
    /// Whether the same transaction may succeed against later state. Only
    /// lost version races qualify.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

// =================================================================
// Finality Errors (5xx)
// =================================================================

/// Data availability and finality failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalityError {
    /// Finality was requested while DA is not confirmed.
    #[error("CW_ERR_500: DA unavailable for {0}: finality forbidden")]
    DaUnavailable(DomainId),

    /// The DA network did not attest availability of the published commit.
    #[error("CW_ERR_501: DA attestation withheld for {0}")]
    DaWithheld(DomainId),

    /// The domain is already final.
    #[error("CW_ERR_502: Domain {0} already finalized")]
    AlreadyFinalized(DomainId),

    /// The requested height does not advance past the last finalized one.
    #[error("CW_ERR_503: Non-monotonic finality height {requested} (last {last})")]
    NonMonotonicHeight { requested: u64, last: u64 },
}

// =================================================================
// Umbrella
// =================================================================

/// Central error enum for all Causeway operations.
#[derive(Debug, Error)]
pub enum CausewayError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Reveal(#[from] RevealError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Finality(#[from] FinalityError),

    /// Unrecoverable internal error.
    #[error("CW_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CW_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// A commitment of the wrong length reached the core.
    #[error("CW_ERR_902: Invalid commitment length: {len} bytes")]
    InvalidCommitmentLength { len: usize },

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("CW_ERR_903: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T, E = CausewayError> = std::result::Result<T, E>;

impl From<serde_json::Error> for CausewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
