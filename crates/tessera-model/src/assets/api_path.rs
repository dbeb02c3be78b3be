//! API paths, each belonging to an API spec

use super::{asset_type, lineage, ApiSpec, LineageAttributes};
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity};

/// A single path (endpoint) of an API spec
pub type ApiPath = Entity<ApiPathAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPathAttributes {
    #[serde(default, rename = "apiPathRawURI", skip_serializing_if = "Option::is_none")]
    pub api_path_raw_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path_is_templated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path_available_operations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_spec: Option<AssetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_spec_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_spec_name: Option<String>,
    #[serde(flatten)]
    pub lineage: LineageAttributes,
}

asset_type!(ApiPathAttributes, ApiPath, "APIPath");
lineage!(ApiPathAttributes);

impl ApiPath {
    /// A new path under the spec `spec_qualified_name`.
    ///
    /// The path is normalised to start with `/`, becomes the asset's name,
    /// and is appended verbatim to the spec's qualified name.
    pub fn creator(path_raw_uri: &str, spec_qualified_name: &str) -> Self {
        let normalized = normalize_path(path_raw_uri);
        let mut path = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(format!("{}{}", spec_qualified_name, normalized))
            .with_name(normalized.clone());
        if let Some(connection) = qn::connection_qualified_name(spec_qualified_name) {
            path = path.with_connection_qualified_name(connection);
        }

        let attrs = path.specific_mut();
        attrs.api_path_is_templated = Some(normalized.contains('{'));
        attrs.api_path_raw_uri = Some(normalized);
        attrs.api_spec = Some(ApiSpec::ref_by_qualified_name(spec_qualified_name));
        attrs.api_spec_qualified_name = Some(spec_qualified_name.to_string());
        attrs.api_spec_name = Some(qn::last_segment(spec_qualified_name).to_string());
        path
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
