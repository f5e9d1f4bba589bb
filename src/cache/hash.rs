//! Content hashing for cache keys.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::sql::{SqlParam, Statement};

const TEXT_TAG: u8 = 0x01;
const INTEGER_TAG: u8 = 0x02;

/// SHA-256 digest of a resolved statement, as 64 lowercase hex characters.
///
/// Covers the SQL text and every bound value, so statements that differ only
/// in their parameters get different fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(statement: &Statement) -> Self {
        let mut hasher = Sha256::new();
        update_bytes(&mut hasher, statement.sql().as_bytes());
        for param in statement.params() {
            match param {
                SqlParam::Text(value) => {
                    hasher.update([TEXT_TAG]);
                    update_bytes(&mut hasher, value.as_bytes());
                }
                SqlParam::Integer(value) => {
                    hasher.update([INTEGER_TAG]);
                    hasher.update(value.to_le_bytes());
                }
            }
        }
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Length-prefixed, so adjacent values cannot run into each other.
fn update_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
