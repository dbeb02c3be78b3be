//! Asset identifiers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating placeholder IDs
static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// A server-assigned globally unique identifier.
///
/// Kept as an opaque string: the server decides the format, and references
/// built from user input must not be rejected locally.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a random v4 GUID (used by in-memory stores)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Guid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Guid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A client-side placeholder for an asset the server has not seen yet.
///
/// Placeholders are unique within the process. On the wire they are
/// rendered as a negative decimal string (`"-17"`), which the server
/// replaces with a real GUID and reports back in its mutation response.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct LocalId(u64);

impl LocalId {
    /// Allocate the next unused placeholder
    pub fn next() -> Self {
        Self(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a LocalId from a raw value (for deserialization/testing)
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The wire form, e.g. `-17`
    pub fn to_wire(&self) -> String {
        format!("-{}", self.0)
    }

    fn from_wire(value: &str) -> Option<Self> {
        value
            .strip_prefix('-')
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(Self)
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Identity of an asset: either a placeholder awaiting assignment, or the
/// GUID the server assigned.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum Identity {
    Pending(LocalId),
    Assigned(Guid),
}

impl Identity {
    /// A fresh placeholder identity
    pub fn pending() -> Self {
        Identity::Pending(LocalId::next())
    }

    /// Parse the wire form. Negative integers are placeholders, everything
    /// else is treated as an assigned GUID.
    pub fn parse(value: &str) -> Self {
        match LocalId::from_wire(value) {
            Some(local) => Identity::Pending(local),
            None => Identity::Assigned(Guid::new(value)),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Identity::Pending(_))
    }

    pub fn assigned(&self) -> Option<&Guid> {
        match self {
            Identity::Assigned(guid) => Some(guid),
            Identity::Pending(_) => None,
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            Identity::Pending(local) => local.to_wire(),
            Identity::Assigned(guid) => guid.to_string(),
        }
    }
}

impl From<Guid> for Identity {
    fn from(guid: Guid) -> Self {
        Identity::Assigned(guid)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Identity::parse(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Identity::parse(&value)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Identity::parse(&value))
    }
}

/// Whether a string has the lexical shape of a UUID.
///
/// Identifiers with this shape are resolved as GUIDs; anything else is
/// treated as a qualified name.
pub fn is_guid_shaped(value: &str) -> bool {
    uuid::Uuid::try_parse(value).is_ok()
}
