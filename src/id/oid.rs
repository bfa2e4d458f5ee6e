//! # Native Object Identifiers
//!
//! 12-byte identifiers in the classic document-store layout: a 4-byte
//! big-endian creation timestamp, 5 random bytes fixed per process, and a
//! 3-byte counter seeded randomly at startup. Rendered as 24 lowercase hex
//! characters.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Byte width of a native identifier.
pub const OID_LEN: usize = 12;

/// Hex width of a native identifier.
pub const OID_HEX_LEN: usize = 24;

/// Raised when a string is not 24 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id '{text}': expected {OID_HEX_LEN} hex characters")]
pub struct ParseOidError {
    pub text: String,
}

/// A native document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid([u8; OID_LEN]);

impl Oid {
    /// Generates a fresh identifier.
    ///
    /// Identifiers generated by one process share the same 5 random middle
    /// bytes and differ in timestamp and counter, so they sort roughly by
    /// creation time.
    pub fn generate() -> Self {
        let mut bytes = [0u8; OID_LEN];

        let secs = Utc::now().timestamp() as u32;
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_entropy());

        let count = counter().fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);

        Oid(bytes)
    }

    /// Parses a 24-character hex string.
    pub fn parse_str(text: &str) -> Result<Self, ParseOidError> {
        if text.len() != OID_HEX_LEN {
            return Err(ParseOidError {
                text: text.to_string(),
            });
        }
        let decoded = hex::decode(text).map_err(|_| ParseOidError {
            text: text.to_string(),
        })?;
        let mut bytes = [0u8; OID_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Oid(bytes))
    }

    /// Builds an identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; OID_LEN]) -> Self {
        Oid(bytes)
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8; OID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation time embedded in the leading 4 bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Oid::parse_str(s)
    }
}

/// 5 random bytes chosen once per process.
fn process_entropy() -> &'static [u8; 5] {
    static ENTROPY: OnceLock<[u8; 5]> = OnceLock::new();
    ENTROPY.get_or_init(rand::random)
}

/// Monotonic counter with a random starting point.
fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::random::<u32>()))
}
