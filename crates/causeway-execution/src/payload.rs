//! Transfer payload codec.
//!
//! Revealed plaintext must decode as exactly one transfer instruction in a
//! fixed-field binary layout (all integers big-endian):
//!
//! ```text
//! [version: u8 = 0x01]
//! [from_len: u16][from: utf8 bytes]
//! [to_len: u16][to: utf8 bytes]
//! [amount: u64]
//! ```
//!
//! Trailing bytes, empty names, zero amounts and self-transfers are all
//! rejected as `MalformedPayload`.

use causeway_types::{ExecutionError, ObjectId, constants};

/// A decoded `{from, to, amount}` transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

impl TransferInstruction {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// State object debited by this transfer.
    #[must_use]
    pub fn source(&self) -> ObjectId {
        ObjectId::account(&self.from)
    }

    /// State object credited by this transfer.
    #[must_use]
    pub fn destination(&self) -> ObjectId {
        ObjectId::account(&self.to)
    }

    /// Canonical encoding.
    ///
    /// # Errors
    /// `MalformedPayload` if an account name is longer than `u16::MAX` bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ExecutionError> {
        let mut out = Vec::with_capacity(1 + 2 + self.from.len() + 2 + self.to.len() + 8);
        out.push(constants::TRANSFER_PAYLOAD_VERSION);
        for (field, name) in [("from", &self.from), ("to", &self.to)] {
            let len = u16::try_from(name.len()).map_err(|_| {
                malformed(format!("{field} account is {} bytes, limit {}", name.len(), u16::MAX))
            })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(name.as_bytes());
        }
        out.extend_from_slice(&self.amount.to_be_bytes());
        Ok(out)
    }

    /// Strictly decode a revealed payload.
    ///
    /// # Errors
    /// `MalformedPayload` describing the first violation found.
    pub fn decode(bytes: &[u8]) -> Result<Self, ExecutionError> {
        let mut reader = Reader { bytes, pos: 0 };

        let version = reader.u8()?;
        if version != constants::TRANSFER_PAYLOAD_VERSION {
            return Err(malformed(format!("unsupported payload version {version:#04x}")));
        }
        let from = reader.name("from")?;
        let to = reader.name("to")?;
        let amount = reader.u64()?;
        if reader.remaining() != 0 {
            return Err(malformed(format!("{} trailing bytes", reader.remaining())));
        }
        if amount == 0 {
            return Err(malformed("zero amount".to_string()));
        }
        if from == to {
            return Err(malformed("source and destination are the same account".to_string()));
        }
        Ok(Self { from, to, amount })
    }
}

fn malformed(reason: String) -> ExecutionError {
    ExecutionError::MalformedPayload { reason }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ExecutionError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| malformed(format!("truncated at byte {}", self.pos)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ExecutionError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ExecutionError> {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(self.take(2)?);
        Ok(u16::from_be_bytes(buf))
    }

    fn u64(&mut self) -> Result<u64, ExecutionError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(buf))
    }

    fn name(&mut self, field: &str) -> Result<String, ExecutionError> {
        let len = usize::from(self.u16()?);
        if len == 0 {
            return Err(malformed(format!("empty {field} account")));
        }
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| malformed(format!("{field} is not utf-8")))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}
