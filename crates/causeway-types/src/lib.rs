//! # causeway-types
//!
//! Shared types, errors, and configuration for the **Causeway** pipeline.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`TxId`], [`ObjectId`], [`DomainId`], [`Commitment`]
//! - **Transaction model**: [`Transaction`], [`FeeEnvelope`]
//! - **Receipt model**: [`Receipt`]
//! - **Domain model**: [`CausalDomain`], [`DomainPhase`], [`OrderedEntry`], [`TxOutcome`]
//! - **State model**: [`StateObject`], [`VersionedWrite`]
//! - **Configuration**: [`CausewayConfig`], [`PipelineConfig`], [`StoreConfig`], [`FailurePolicy`]
//! - **Errors**: [`CausewayError`] and the per-stage enums, with `CW_ERR_` prefix codes
//! - **Digests**: [`digest::fold_commitments`], the tagged fold behind ordering roots
//!   and DA commitments
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod digest;
pub mod domain;
pub mod error;
pub mod ids;
pub mod receipt;
pub mod state;
pub mod transaction;

// Re-export all primary types at crate root for ergonomic imports:
//   use causeway_types::{Transaction, CausalDomain, Receipt, ...};

pub use config::*;
pub use domain::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;
pub use state::*;
pub use transaction::*;

// Constants are accessed via `causeway_types::constants::FOO`
// (not re-exported to avoid name collisions).
