//! Relational tables

use super::{asset_type, lineage, LineageAttributes};
use crate::entity::Entity;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity};

/// A table in a relational database
pub type Table = Entity<TableAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_partitioned: Option<bool>,
    #[serde(flatten)]
    pub lineage: LineageAttributes,
}

asset_type!(TableAttributes, Table, "Table");
lineage!(TableAttributes);

impl Table {
    /// A new table inside the schema `schema_qualified_name`
    /// (`{connection}/{database}/{schema}`)
    pub fn creator(name: impl Into<String>, schema_qualified_name: &str) -> Self {
        let name = name.into();
        let qualified_name = qn::child_qualified_name(schema_qualified_name, &name);
        let database_qualified_name = qn::parent_qualified_name(schema_qualified_name);

        let mut table = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qualified_name)
            .with_name(name);
        if let Some(connection) = qn::connection_qualified_name(schema_qualified_name) {
            table = table.with_connection_qualified_name(connection);
        }

        let attrs = table.specific_mut();
        attrs.schema_name = Some(qn::last_segment(schema_qualified_name).to_string());
        attrs.schema_qualified_name = Some(schema_qualified_name.to_string());
        attrs.database_name = database_qualified_name.map(|db| qn::last_segment(db).to_string());
        attrs.database_qualified_name = database_qualified_name.map(String::from);
        table
    }

    pub fn with_row_count(mut self, rows: u64) -> Self {
        self.specific_mut().row_count = Some(rows);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Lineage, Referenceable};

    #[test]
    fn test_creator_derives_parents() {
        let table = Table::creator("ORDERS", "default/snowflake/1700000000/SALES/PUBLIC");
        assert_eq!(
            table.qualified_name(),
            Some("default/snowflake/1700000000/SALES/PUBLIC/ORDERS")
        );
        let attrs = table.specific();
        assert_eq!(attrs.schema_name.as_deref(), Some("PUBLIC"));
        assert_eq!(attrs.database_name.as_deref(), Some("SALES"));
        assert_eq!(
            attrs.database_qualified_name.as_deref(),
            Some("default/snowflake/1700000000/SALES")
        );
        assert_eq!(
            table.common().connection_qualified_name.as_deref(),
            Some("default/snowflake/1700000000")
        );
    }

    #[test]
    fn test_creators_get_distinct_placeholders() {
        let a = Table::creator("A", "c/x/y/DB/S");
        let b = Table::creator("B", "c/x/y/DB/S");
        assert!(a.guid.as_ref().is_some_and(Identity::is_pending));
        assert_ne!(a.guid, b.guid);
    }

    #[test]
    fn test_lineage_defaults_to_empty() {
        let table = Table::updater("c/x/y/DB/S/T", "T");
        assert!(!table.has_lineage());
        assert!(table.input_to_processes().is_empty());
    }
}
