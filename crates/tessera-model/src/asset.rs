//! The tagged variant over every asset type

use crate::assets::{
    ApiPath, ApiSpec, BiReport, Connection, Dashboard, GlossaryTerm, Persona, Process, Purpose,
    Table,
};
use crate::entity::{CommonAttributes, Entity, GenericAttributes};
use crate::registry::TypeRegistry;
use crate::types::{EntityStatus, Tag};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

/// Evaluate an expression against whichever entity an [`Asset`] holds
macro_rules! with_entity {
    ($asset:expr, $e:ident => $body:expr) => {
        match $asset {
            $crate::asset::Asset::Connection($e) => $body,
            $crate::asset::Asset::Table($e) => $body,
            $crate::asset::Asset::Dashboard($e) => $body,
            $crate::asset::Asset::BiReport($e) => $body,
            $crate::asset::Asset::Persona($e) => $body,
            $crate::asset::Asset::Purpose($e) => $body,
            $crate::asset::Asset::Process($e) => $body,
            $crate::asset::Asset::ApiSpec($e) => $body,
            $crate::asset::Asset::ApiPath($e) => $body,
            $crate::asset::Asset::GlossaryTerm($e) => $body,
            $crate::asset::Asset::Generic($e) => $body,
        }
    };
}

pub(crate) use with_entity;

/// Any catalog asset, keyed by its `typeName`.
///
/// Values returned by the server are decoded through the [`TypeRegistry`];
/// types without a registered definition land in [`Asset::Generic`].
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Connection(Connection),
    Table(Table),
    Dashboard(Dashboard),
    BiReport(BiReport),
    Persona(Persona),
    Purpose(Purpose),
    Process(Process),
    ApiSpec(ApiSpec),
    ApiPath(ApiPath),
    GlossaryTerm(GlossaryTerm),
    Generic(Entity<GenericAttributes>),
}

impl Asset {
    pub fn common(&self) -> &CommonAttributes {
        with_entity!(self, e => e.common())
    }

    pub fn common_mut(&mut self) -> &mut CommonAttributes {
        with_entity!(self, e => e.common_mut())
    }

    pub fn name(&self) -> Option<&str> {
        self.common().name.as_deref()
    }

    pub fn status(&self) -> EntityStatus {
        with_entity!(self, e => e.status.unwrap_or_default())
    }

    pub fn is_active(&self) -> bool {
        self.status() == EntityStatus::Active
    }

    pub fn classifications(&self) -> Option<&Vec<Tag>> {
        with_entity!(self, e => e.classifications.as_ref())
    }

    pub fn set_classifications(&mut self, tags: Option<Vec<Tag>>) {
        with_entity!(self, e => e.classifications = tags)
    }

    pub fn tag_names(&self) -> Vec<&str> {
        with_entity!(self, e => e.tag_names())
    }

    /// Attributes marked to be cleared on save
    pub fn null_fields(&self) -> &BTreeSet<String> {
        with_entity!(self, e => &e.null_fields)
    }

    pub fn null_field(&mut self, field: &str) {
        with_entity!(self, e => e.null_field(field))
    }

    /// Decode a wire value with the built-in registry
    pub fn from_json(value: serde_json::Value) -> tessera_core::Result<Self> {
        TypeRegistry::global().decode(value)
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        with_entity!(self, e => e.serialize(serializer))
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        TypeRegistry::global()
            .decode(value)
            .map_err(serde::de::Error::custom)
    }
}

impl From<Entity<GenericAttributes>> for Asset {
    fn from(entity: Entity<GenericAttributes>) -> Self {
        Asset::Generic(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{CatalogAsset, Referenceable};
    use serde_json::json;

    #[test]
    fn test_decode_known_type() {
        let asset: Asset = serde_json::from_value(json!({
            "typeName": "Table",
            "guid": "6f1e2a8c-8a44-4d6e-9d0b-2f4c1b7e9a10",
            "attributes": {"qualifiedName": "c/db/s/t", "name": "t", "rowCount": 12}
        }))
        .unwrap();
        let table = Table::from_asset(asset).unwrap();
        assert_eq!(table.specific().row_count, Some(12));
    }

    #[test]
    fn test_decode_unknown_type_is_generic() {
        let asset: Asset = serde_json::from_value(json!({
            "typeName": "KafkaTopic",
            "attributes": {"qualifiedName": "k/t", "partitionCount": 3}
        }))
        .unwrap();
        assert!(matches!(asset, Asset::Generic(_)));
        assert_eq!(asset.type_name(), "KafkaTopic");
        assert_eq!(asset.qualified_name(), Some("k/t"));
    }

    #[test]
    fn test_narrowing_mismatch_returns_original() {
        let asset = Dashboard::updater("c/d", "d").into_asset();
        let back = Table::from_asset(asset.clone()).unwrap_err();
        assert_eq!(back, asset);
    }

    #[test]
    fn test_serialize_delegates_to_entity() {
        let asset = Table::updater("c/db/s/t", "t").into_asset();
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["typeName"], "Table");
        assert_eq!(value["attributes"]["qualifiedName"], "c/db/s/t");
    }
}
