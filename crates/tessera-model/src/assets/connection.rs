//! Connections: the root of every other asset's qualified name

use super::asset_type;
use crate::entity::Entity;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tessera_core::Identity;

/// A connection to a source system (a warehouse, a BI tool, an API)
pub type Connection = Entity<ConnectionAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_groups: Option<Vec<String>>,
}

asset_type!(ConnectionAttributes, Connection, "Connection");

impl Connection {
    /// A new connection, keyed `default/{connector}/{epoch seconds}`
    pub fn creator(name: impl Into<String>, connector: &str) -> Self {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::creator_at(name, connector, epoch)
    }

    /// Like [`Connection::creator`] with an explicit creation timestamp
    pub fn creator_at(name: impl Into<String>, connector: &str, epoch_seconds: u64) -> Self {
        let qualified_name = format!("default/{}/{}", connector, epoch_seconds);
        let mut connection = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qualified_name)
            .with_name(name);
        connection.common_mut().connector_name = Some(connector.to_string());
        connection
    }

    pub fn with_admin_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specific_mut().admin_users = Some(users.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Referenceable;

    #[test]
    fn test_creator_key() {
        let connection = Connection::creator_at("prod", "snowflake", 1_700_000_000);
        assert_eq!(
            connection.qualified_name(),
            Some("default/snowflake/1700000000")
        );
        assert_eq!(connection.common().connector_name.as_deref(), Some("snowflake"));
        assert!(connection.guid.as_ref().is_some_and(Identity::is_pending));
    }

    #[test]
    fn test_admins() {
        let connection = Connection::creator("prod", "postgres").with_admin_users(["ada"]);
        assert_eq!(connection.specific().admin_users, Some(vec!["ada".to_string()]));
    }
}
