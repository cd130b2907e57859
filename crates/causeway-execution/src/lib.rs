//! # causeway-execution
//!
//! **Reveal and execution** for ordered transactions.
//!
//! ## Architecture
//!
//! 1. **RevealAdapter**: obtains plaintext from a pluggable [`RevealService`],
//!    and only for transactions whose ordering position is fixed
//! 2. **payload**: strict fixed-field decoder for transfer instructions
//! 3. **StateStore**: versioned object store with all-or-nothing commits
//! 4. **ExecutionEngine**: applies one transfer deterministically
//!
//! ## Flow
//!
//! ```text
//! OrderedEntry → RevealAdapter.reveal() → plaintext
//!     → ExecutionEngine.execute(tx, plaintext, store) → StateStore.commit()
//! ```
//!
//! A failed execution leaves the store untouched.

pub mod executor;
pub mod payload;
pub mod reveal;
pub mod state_store;

pub use executor::{ExecutionEngine, TransferEffect};
pub use payload::TransferInstruction;
pub use reveal::{
    DecliningRevealer, OrderPosition, PassthroughRevealer, RevealAdapter, RevealRequest,
    RevealService,
};
pub use state_store::{InMemoryStateStore, StateStore, StoreError};
