//! # causeway-ingress
//!
//! **Admission boundary**: structural validation, deterministic domain
//! assignment, receipt issuance, and routing into causal domains.
//!
//! ## Architecture
//!
//! Ingress sits between the transport layer and the ordering engine:
//! 1. **AdmissionValidator**: hard gate on read/write sets and fee envelope
//! 2. **assign_domain**: pure write-set → `DomainId` hash
//! 3. **DomainRouter**: appends admitted transactions to their domain's pending set
//!
//! ## Submission Flow
//!
//! ```text
//! transport → AdmissionValidator.admit() → Receipt
//!           → DomainRouter.route() → CausalDomain.pending
//! ```
//!
//! Ciphertext crosses this boundary untouched: nothing here reads it.

pub mod admission;
pub mod commit;
pub mod domain_assigner;
pub mod domain_router;

pub use admission::{AdmissionStats, AdmissionValidator};
pub use commit::{CommitParams, commit_transaction, compute_commitment};
pub use domain_assigner::assign_domain;
pub use domain_router::DomainRouter;
