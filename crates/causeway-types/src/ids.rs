//! Identifiers used throughout Causeway.
//!
//! `TxId` and `ObjectId` are chosen by submitters; `DomainId` is derived
//! from a write-set and has no public constructor outside the domain
//! assigner's digest path; `Commitment` is a fixed 32-byte digest.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CausewayError, constants};

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

/// Submitter-chosen transaction identifier.
///
/// Lexicographic ordering is the secondary ordering key when two
/// transactions carry the same commitment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// Key of a state object (e.g. `acct:Alice`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Object id of the account with the given name.
    #[must_use]
    pub fn account(name: &str) -> Self {
        Self(format!("{}{name}", constants::ACCOUNT_PREFIX))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Identifier of a causal domain: `cd_` followed by hex of the write-set
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(String);

impl DomainId {
    /// Build a domain id from a write-set digest.
    ///
    /// Only the first [`constants::DOMAIN_ID_HEX_LEN`] hex characters are
    /// kept.
    #[must_use]
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let hex = hex::encode(digest);
        Self(format!(
            "{}{}",
            constants::DOMAIN_ID_PREFIX,
            &hex[..constants::DOMAIN_ID_HEX_LEN]
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Commitment
// ---------------------------------------------------------------------------

/// Fixed-size digest binding a transaction's encrypted payload.
///
/// Compared byte-for-byte by the ordering engine; never derived from
/// plaintext inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Commitment(pub [u8; constants::COMMITMENT_LEN]);

impl Commitment {
    #[must_use]
    pub fn new(bytes: [u8; constants::COMMITMENT_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a commitment from an untrusted byte slice.
    ///
    /// # Errors
    /// Returns [`CausewayError::InvalidCommitmentLength`] unless the slice
    /// is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CausewayError> {
        let arr: [u8; constants::COMMITMENT_LEN] = bytes
            .try_into()
            .map_err(|_| CausewayError::InvalidCommitmentLength { len: bytes.len() })?;
        Ok(Self(arr))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::COMMITMENT_LEN] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
