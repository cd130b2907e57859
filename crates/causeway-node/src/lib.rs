//! # causeway-node
//!
//! Wires the Causeway stages into a node.
//!
//! ```text
//! submit(tx) → AdmissionValidator → DomainRouter
//! process_all(height) → per domain, on its own task:
//!     order → reveal + execute → DA publish → finalize
//! ```
//!
//! Domains are processed concurrently and independently. Objects shared by
//! two domains stay consistent through the state store's versioned commit.

pub mod logging;
pub mod node;
pub mod pipeline;

pub use logging::{LogFormat, init as init_logging};
pub use node::{Node, ProcessReport};
pub use pipeline::{DomainPipeline, PipelineError};
