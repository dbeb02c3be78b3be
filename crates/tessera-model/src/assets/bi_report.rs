//! BI reports, each anchored to a dashboard

use super::{asset_type, lineage, Dashboard, LineageAttributes};
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity};

/// A report published inside a BI dashboard
pub type BiReport = Entity<BiReportAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiReportAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<AssetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_qualified_name: Option<String>,
    #[serde(flatten)]
    pub lineage: LineageAttributes,
}

asset_type!(BiReportAttributes, BiReport, "BIReport");
lineage!(BiReportAttributes);

impl BiReport {
    pub fn creator(name: impl Into<String>, dashboard_qualified_name: &str) -> Self {
        let name = name.into();
        let mut report = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qn::child_qualified_name(dashboard_qualified_name, &name))
            .with_name(name);
        if let Some(connection) = qn::connection_qualified_name(dashboard_qualified_name) {
            report = report.with_connection_qualified_name(connection);
        }
        let attrs = report.specific_mut();
        attrs.dashboard = Some(Dashboard::ref_by_qualified_name(dashboard_qualified_name));
        attrs.dashboard_qualified_name = Some(dashboard_qualified_name.to_string());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Referenceable;

    #[test]
    fn test_creator_links_dashboard() {
        let report = BiReport::creator("Q3", "default/looker/1700000000/Revenue");
        assert_eq!(
            report.qualified_name(),
            Some("default/looker/1700000000/Revenue/Q3")
        );
        let dashboard = report.specific().dashboard.as_ref().unwrap();
        assert_eq!(dashboard.type_name, "Dashboard");
        assert_eq!(
            dashboard.qualified_name(),
            Some("default/looker/1700000000/Revenue")
        );
    }
}
