//! Content hashing for generated unique keys

use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 digest used to derive stable qualified names.
///
/// Processes created without an explicit identifier get a qualified name
/// derived from the assets they connect, so creating the same process
/// twice produces the same key instead of a duplicate.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct KeyHash([u8; 32]);

impl KeyHash {
    /// Compute a hash from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash an ordered sequence of parts, separated so that
    /// `["ab", "c"]` and `["a", "bc"]` differ
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_ref().as_bytes());
            hasher.update([0u8]);
        }
        Self(hasher.finalize().into())
    }

    /// Get the hash as a hex string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(KeyHash::from_bytes(b"hello"), KeyHash::from_bytes(b"hello"));
        assert_ne!(KeyHash::from_bytes(b"hello"), KeyHash::from_bytes(b"world"));
    }

    #[test]
    fn test_parts_are_separated() {
        assert_ne!(KeyHash::from_parts(["ab", "c"]), KeyHash::from_parts(["a", "bc"]));
    }

    #[test]
    fn test_hex_length() {
        assert_eq!(KeyHash::from_bytes(b"x").to_hex().len(), 64);
    }
}
