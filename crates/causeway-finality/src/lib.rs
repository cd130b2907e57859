//! # causeway-finality
//!
//! **Finality plane**: data availability publication and the finality gate.
//!
//! ## Architecture
//!
//! Once every transaction of an ordered domain has an outcome:
//! 1. [`DaPublisher`] computes the DA commitment over the ordered sequence
//!    and asks a [`DaAttestor`] to confirm availability
//! 2. [`FinalityGate`] finalizes the domain only if DA was attested
//!
//! Finality never precedes availability: a domain whose DA attestation was
//! withheld stays open and can be published again later.

pub mod da_publisher;
pub mod finality_gate;

pub use da_publisher::{DaAttestor, DaPublisher, LocalAttestor, WithholdingAttestor, is_available};
pub use finality_gate::{FinalityGate, FinalityRecord};
