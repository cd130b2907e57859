//! # causeway-ordering
//!
//! **Pure deterministic ordering for Causeway.**
//!
//! Ordering is the compute plane between admission and reveal: it takes a
//! causal domain's pending set and fixes its execution order. It has:
//!
//! - **Plaintext-blind comparison**: commitments only, never ciphertext,
//!   fee or arrival time
//! - **Deterministic output**: same pending set -> same sequence on every node
//! - **Explicit tie-break**: equal commitments fall back to `TxId`
//! - **Sequence digests**: the ordering root (proof of position for reveal)
//!   and the DA commitment (input to finality)

pub mod determinism;
pub mod ordering;

pub use determinism::{da_commitment, ordering_root, verify_da_commitment};
pub use ordering::{compare_for_ordering, order_domain, order_transactions};
