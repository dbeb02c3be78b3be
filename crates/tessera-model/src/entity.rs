//! The generic entity shape shared by every asset type

use crate::reference::AssetReference;
use crate::types::{
    AnnouncementType, CertificateStatus, EntityStatus, SaveSemantic, Tag, UniqueAttributes,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tessera_core::Identity;

/// Attributes every asset carries, regardless of type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_status: Option<CertificateStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_type: Option<AnnouncementType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_name: Option<String>,
    /// Glossary terms assigned to this asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meanings: Option<Vec<AssetReference>>,
}

/// Common attributes followed by the type-specific ones, flattened into a
/// single `attributes` object on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes<A> {
    #[serde(flatten)]
    pub common: CommonAttributes,
    #[serde(flatten)]
    pub specific: A,
}

/// Attributes of a type with no registered definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericAttributes {
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One catalog entity: identity, lifecycle, tags and attributes.
///
/// Concrete asset types are aliases over this struct (`Table` is
/// `Entity<TableAttributes>`), so the identity and metadata handling below
/// is written once for every type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "A: Deserialize<'de> + Default")
)]
pub struct Entity<A> {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_attributes: Option<UniqueAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<Tag>>,
    #[serde(default)]
    pub attributes: Attributes<A>,
    /// Semantic applied when this entity is itself used as a relationship
    #[serde(skip)]
    pub semantic: SaveSemantic,
    /// Attributes to send as explicit `null`, clearing the stored value
    #[serde(skip)]
    pub null_fields: BTreeSet<String>,
}

impl<A: Default> Entity<A> {
    /// An empty entity of the given type
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            guid: None,
            status: None,
            unique_attributes: None,
            classifications: None,
            attributes: Attributes::default(),
            semantic: SaveSemantic::Replace,
            null_fields: BTreeSet::new(),
        }
    }
}

impl Entity<GenericAttributes> {
    /// An entity of a type with no registered definition
    pub fn generic(type_name: impl Into<String>) -> Self {
        Entity::of_type(type_name)
    }
}

impl<A> Entity<A> {
    pub fn common(&self) -> &CommonAttributes {
        &self.attributes.common
    }

    pub fn common_mut(&mut self) -> &mut CommonAttributes {
        &mut self.attributes.common
    }

    pub fn specific(&self) -> &A {
        &self.attributes.specific
    }

    pub fn specific_mut(&mut self) -> &mut A {
        &mut self.attributes.specific
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.common.name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.status.unwrap_or_default() == EntityStatus::Active
    }

    /// Names of the tags currently assigned
    pub fn tag_names(&self) -> Vec<&str> {
        self.classifications
            .iter()
            .flatten()
            .map(|t| t.name())
            .collect()
    }

    /// Mark an attribute to be cleared on save
    pub fn null_field(&mut self, field: &str) {
        self.null_fields.insert(field.to_string());
    }

    pub fn with_guid(mut self, guid: impl Into<Identity>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.attributes.common.qualified_name = Some(qualified_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.common.name = Some(name.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.attributes.common.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.attributes.common.description = Some(description.into());
        self
    }

    pub fn with_user_description(mut self, description: impl Into<String>) -> Self {
        self.attributes.common.user_description = Some(description.into());
        self
    }

    pub fn with_owner_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.common.owner_users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_owner_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.common.owner_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_certificate(mut self, status: CertificateStatus, message: Option<String>) -> Self {
        self.attributes.common.certificate_status = Some(status);
        self.attributes.common.certificate_status_message = message;
        self
    }

    pub fn with_announcement(
        mut self,
        kind: AnnouncementType,
        title: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        self.attributes.common.announcement_type = Some(kind);
        self.attributes.common.announcement_title = Some(title.into());
        self.attributes.common.announcement_message = message;
        self
    }

    pub fn with_meanings(mut self, terms: Vec<AssetReference>) -> Self {
        self.attributes.common.meanings = Some(terms);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.classifications = Some(tags);
        self
    }

    pub fn with_connection_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.attributes.common.connection_qualified_name = Some(qualified_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generic_roundtrip_keeps_unknown_attributes() {
        let value = json!({
            "typeName": "SnowflakeStream",
            "guid": "g-1",
            "status": "ACTIVE",
            "attributes": {
                "qualifiedName": "default/snowflake/1/DB/S/STREAM",
                "name": "STREAM",
                "streamMode": "APPEND_ONLY"
            }
        });
        let entity: Entity<GenericAttributes> = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(entity.name(), Some("STREAM"));
        assert_eq!(
            entity.specific().extra.get("streamMode"),
            Some(&json!("APPEND_ONLY"))
        );
        assert_eq!(serde_json::to_value(&entity).unwrap(), value);
    }

    #[test]
    fn test_builder_setters() {
        let entity: Entity<GenericAttributes> = Entity::of_type("Table")
            .with_qualified_name("db/t")
            .with_name("t")
            .with_owner_users(["ada", "grace"])
            .with_certificate(CertificateStatus::Draft, None);
        assert_eq!(entity.common().qualified_name.as_deref(), Some("db/t"));
        assert_eq!(
            entity.common().owner_users,
            Some(vec!["ada".to_string(), "grace".to_string()])
        );
        assert!(entity.is_active());
    }

    #[test]
    fn test_missing_status_means_active() {
        let entity: Entity<GenericAttributes> =
            serde_json::from_value(json!({"typeName": "Table"})).unwrap();
        assert!(entity.is_active());
        assert!(entity.tag_names().is_empty());
    }
}
