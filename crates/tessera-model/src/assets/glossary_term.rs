//! Glossary terms

use super::asset_type;
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::Identity;

/// A business term, anchored in a glossary and assignable to assets
pub type GlossaryTerm = Entity<GlossaryTermAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AssetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_entities: Option<Vec<AssetReference>>,
}

asset_type!(GlossaryTermAttributes, GlossaryTerm, "AtlasGlossaryTerm");

impl GlossaryTerm {
    /// A new term in the glossary `glossary_qualified_name`, keyed
    /// `{name}@{glossary}`
    pub fn creator(name: impl Into<String>, glossary_qualified_name: &str) -> Self {
        let name = name.into();
        let mut term = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(format!("{}@{}", name, glossary_qualified_name))
            .with_name(name);
        term.specific_mut().anchor = Some(AssetReference::by_qualified_name(
            "AtlasGlossary",
            glossary_qualified_name,
        ));
        term
    }
}
