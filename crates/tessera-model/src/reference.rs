//! Relationship references

use crate::types::{SaveSemantic, UniqueAttributes};
use serde::{Deserialize, Serialize};
use tessera_core::Identity;

/// How a reference identifies its target. Exactly one key is ever held.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    Guid(Identity),
    UniqueAttributes(UniqueAttributes),
}

/// A minimal handle to an asset, used inside another asset's relationship
/// collections.
///
/// The referenced asset's lifetime is not owned here; a reference is only
/// a lookup key resolved by the server when the owning asset is saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawReference", into = "RawReference")]
pub struct AssetReference {
    pub type_name: String,
    pub key: ReferenceKey,
    pub semantic: SaveSemantic,
}

impl AssetReference {
    pub fn by_guid(type_name: impl Into<String>, guid: impl Into<Identity>) -> Self {
        Self {
            type_name: type_name.into(),
            key: ReferenceKey::Guid(guid.into()),
            semantic: SaveSemantic::Replace,
        }
    }

    pub fn by_qualified_name(
        type_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            key: ReferenceKey::UniqueAttributes(UniqueAttributes::new(qualified_name)),
            semantic: SaveSemantic::Replace,
        }
    }

    /// The same reference with a different save semantic
    pub fn with_semantic(mut self, semantic: SaveSemantic) -> Self {
        self.semantic = semantic;
        self
    }

    pub fn guid(&self) -> Option<&Identity> {
        match &self.key {
            ReferenceKey::Guid(guid) => Some(guid),
            ReferenceKey::UniqueAttributes(_) => None,
        }
    }

    pub fn qualified_name(&self) -> Option<&str> {
        match &self.key {
            ReferenceKey::Guid(_) => None,
            ReferenceKey::UniqueAttributes(unique) => Some(&unique.qualified_name),
        }
    }

    /// Whether two references point at the same target, ignoring semantics
    pub fn same_target(&self, other: &AssetReference) -> bool {
        self.type_name == other.type_name && self.key == other.key
    }

    /// A display key: the guid or the qualified name
    pub fn key_string(&self) -> String {
        match &self.key {
            ReferenceKey::Guid(guid) => guid.to_wire(),
            ReferenceKey::UniqueAttributes(unique) => unique.qualified_name.clone(),
        }
    }
}

/// Wire shape of a reference. Server responses often carry both a guid
/// and unique attributes; the guid wins.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReference {
    type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guid: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_attributes: Option<UniqueAttributes>,
    #[serde(default, skip_serializing_if = "SaveSemantic::is_replace")]
    semantic: SaveSemantic,
}

impl TryFrom<RawReference> for AssetReference {
    type Error = String;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        let key = match (raw.guid, raw.unique_attributes) {
            (Some(guid), _) => ReferenceKey::Guid(guid),
            (None, Some(unique)) => ReferenceKey::UniqueAttributes(unique),
            (None, None) => {
                return Err(format!(
                    "reference to {} has neither guid nor uniqueAttributes",
                    raw.type_name
                ))
            }
        };
        Ok(AssetReference {
            type_name: raw.type_name,
            key,
            semantic: raw.semantic,
        })
    }
}

impl From<AssetReference> for RawReference {
    fn from(reference: AssetReference) -> Self {
        let (guid, unique_attributes) = match reference.key {
            ReferenceKey::Guid(guid) => (Some(guid), None),
            ReferenceKey::UniqueAttributes(unique) => (None, Some(unique)),
        };
        RawReference {
            type_name: reference.type_name,
            guid,
            unique_attributes,
            semantic: reference.semantic,
        }
    }
}
