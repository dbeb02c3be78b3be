//! API specifications

use super::asset_type;
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity};

/// An API specification (for example an OpenAPI document)
pub type ApiSpec = Entity<ApiSpecAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpecAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_spec_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_spec_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_external_docs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_paths: Option<Vec<AssetReference>>,
}

asset_type!(ApiSpecAttributes, ApiSpec, "APISpec");

impl ApiSpec {
    pub fn creator(name: impl Into<String>, connection_qualified_name: &str) -> Self {
        let name = name.into();
        Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qn::child_qualified_name(connection_qualified_name, &name))
            .with_name(name)
            .with_connection_qualified_name(connection_qualified_name)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.specific_mut().api_spec_version = Some(version.into());
        self
    }
}
