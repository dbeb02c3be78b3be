//! Shared enums and small value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a reference affects an existing relationship collection when the
/// asset that holds it is saved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaveSemantic {
    /// The submitted collection replaces the stored one
    #[default]
    Replace,
    /// Submitted references are added to the stored collection
    Append,
    /// Submitted references are removed from the stored collection
    Remove,
}

impl SaveSemantic {
    pub fn is_replace(&self) -> bool {
        matches!(self, SaveSemantic::Replace)
    }
}

impl FromStr for SaveSemantic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(SaveSemantic::Replace),
            "append" => Ok(SaveSemantic::Append),
            "remove" => Ok(SaveSemantic::Remove),
            other => Err(format!(
                "unknown save semantic '{}' (expected replace, append or remove)",
                other
            )),
        }
    }
}

/// Lifecycle status of an asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityStatus {
    #[default]
    Active,
    /// Soft-deleted (archived)
    Deleted,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityStatus::Active => write!(f, "ACTIVE"),
            EntityStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

/// Certification state of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    Verified,
    Draft,
    Deprecated,
}

impl FromStr for CertificateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VERIFIED" => Ok(CertificateStatus::Verified),
            "DRAFT" => Ok(CertificateStatus::Draft),
            "DEPRECATED" => Ok(CertificateStatus::Deprecated),
            other => Err(format!("unknown certificate status '{}'", other)),
        }
    }
}

/// Kind of announcement banner shown on an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Information,
    Warning,
    Issue,
}

impl FromStr for AnnouncementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "information" => Ok(AnnouncementType::Information),
            "warning" => Ok(AnnouncementType::Warning),
            "issue" => Ok(AnnouncementType::Issue),
            other => Err(format!("unknown announcement type '{}'", other)),
        }
    }
}

/// The unique-attribute projection of an asset: just its qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueAttributes {
    pub qualified_name: String,
}

impl UniqueAttributes {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
        }
    }
}

/// A tag (classification) assigned to an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Name of the tag type
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_propagations_on_entity_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_propagation_through_lineage: Option<bool>,
}

impl Tag {
    /// A tag with server-default propagation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_name: name.into(),
            propagate: None,
            remove_propagations_on_entity_delete: None,
            restrict_propagation_through_lineage: None,
        }
    }

    /// A tag with explicit propagation settings
    pub fn propagating(name: impl Into<String>, propagate: bool) -> Self {
        Self {
            type_name: name.into(),
            propagate: Some(propagate),
            remove_propagations_on_entity_delete: Some(true),
            restrict_propagation_through_lineage: Some(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.type_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_default_is_replace() {
        assert_eq!(SaveSemantic::default(), SaveSemantic::Replace);
        assert!(SaveSemantic::Replace.is_replace());
        assert!(!SaveSemantic::Append.is_replace());
    }

    #[test]
    fn test_semantic_from_str() {
        assert_eq!("APPEND".parse::<SaveSemantic>(), Ok(SaveSemantic::Append));
        assert_eq!("remove".parse::<SaveSemantic>(), Ok(SaveSemantic::Remove));
        assert!("merge".parse::<SaveSemantic>().is_err());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&CertificateStatus::Verified).unwrap(),
            "\"VERIFIED\""
        );
        assert_eq!(
            serde_json::to_string(&AnnouncementType::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(serde_json::to_string(&EntityStatus::Deleted).unwrap(), "\"DELETED\"");
    }

    #[test]
    fn test_tag_serde() {
        let tag: Tag = serde_json::from_str(r#"{"typeName":"PII","propagate":true}"#).unwrap();
        assert_eq!(tag.name(), "PII");
        assert_eq!(tag.propagate, Some(true));
        assert_eq!(tag.restrict_propagation_through_lineage, None);
    }
}
