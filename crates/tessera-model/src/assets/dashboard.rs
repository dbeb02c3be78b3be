//! BI dashboards

use super::{asset_type, lineage, LineageAttributes};
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity};

/// A dashboard in a BI tool
pub type Dashboard = Entity<DashboardAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<AssetReference>>,
    #[serde(flatten)]
    pub lineage: LineageAttributes,
}

asset_type!(DashboardAttributes, Dashboard, "Dashboard");
lineage!(DashboardAttributes);

impl Dashboard {
    pub fn creator(name: impl Into<String>, connection_qualified_name: &str) -> Self {
        let name = name.into();
        Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qn::child_qualified_name(connection_qualified_name, &name))
            .with_name(name)
            .with_connection_qualified_name(connection_qualified_name)
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.specific_mut().source_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Referenceable;

    #[test]
    fn test_creator() {
        let dashboard = Dashboard::creator("Revenue", "default/looker/1700000000")
            .with_source_url("https://bi.example.com/d/1");
        assert_eq!(
            dashboard.qualified_name(),
            Some("default/looker/1700000000/Revenue")
        );
        assert_eq!(
            dashboard.specific().source_url.as_deref(),
            Some("https://bi.example.com/d/1")
        );
    }
}
