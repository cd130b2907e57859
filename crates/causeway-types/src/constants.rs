//! System-wide constants for the Causeway pipeline.

/// Length in bytes of a transaction commitment.
pub const COMMITMENT_LEN: usize = 32;

/// Human-legible prefix of every domain identifier.
pub const DOMAIN_ID_PREFIX: &str = "cd_";

/// Number of hex characters of the write-set digest kept in a domain id
/// (128 bits).
pub const DOMAIN_ID_HEX_LEN: usize = 32;

/// Separator byte written after every object id when hashing a write-set.
pub const WRITE_SET_SEPARATOR: u8 = 0x00;

/// Prefix that turns an account name into its state object id.
pub const ACCOUNT_PREFIX: &str = "acct:";

/// Domain-separation tag of the ordering root digest.
pub const ORDERING_ROOT_TAG: &[u8] = b"causeway:ordering_root:v1:";

/// Domain-separation tag of the DA commitment digest.
pub const DA_COMMIT_TAG: &[u8] = b"causeway:da:v1:";

/// Current version byte of the transfer payload encoding.
pub const TRANSFER_PAYLOAD_VERSION: u8 = 0x01;

/// Default reveal timeout in milliseconds.
pub const DEFAULT_REVEAL_TIMEOUT_MS: u64 = 2_000;

/// Default maximum number of pending transactions per causal domain.
pub const DEFAULT_MAX_PENDING_PER_DOMAIN: usize = 10_000;

/// Default number of optimistic commit retries on a version conflict.
pub const DEFAULT_MAX_COMMIT_RETRIES: u32 = 8;

/// Default `tracing` filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "causeway=info";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Causeway";
