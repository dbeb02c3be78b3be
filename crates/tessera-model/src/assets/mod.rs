//! Concrete asset types
//!
//! Each type is an [`Entity`](crate::Entity) over its own attribute
//! struct. Everything generic (references, updaters, trimming, narrowing)
//! comes from [`CatalogAsset`](crate::CatalogAsset); the modules here only
//! hold attributes and type-specific creators.

use crate::reference::AssetReference;
use serde::{Deserialize, Serialize};

/// Process relationships carried by lineage-capable assets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_to_processes: Option<Vec<AssetReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_from_processes: Option<Vec<AssetReference>>,
}

/// Implement `TypeAttributes` for an attribute struct, binding it to its
/// `Asset` variant and `typeName`. Extra trait items may follow in braces.
macro_rules! asset_type {
    ($attrs:ident, $variant:ident, $type_name:literal) => {
        asset_type!($attrs, $variant, $type_name, {});
    };
    ($attrs:ident, $variant:ident, $type_name:literal, { $($extra:tt)* }) => {
        impl $crate::traits::TypeAttributes for $attrs {
            const TYPE_NAME: &'static str = $type_name;

            $($extra)*

            fn wrap(entity: $crate::entity::Entity<Self>) -> $crate::asset::Asset {
                $crate::asset::Asset::$variant(entity)
            }

            fn narrow(
                asset: $crate::asset::Asset,
            ) -> std::result::Result<$crate::entity::Entity<Self>, $crate::asset::Asset> {
                match asset {
                    $crate::asset::Asset::$variant(entity) => Ok(entity),
                    other => Err(other),
                }
            }
        }
    };
}

/// Implement `Lineage` for an entity whose attributes hold a `lineage` field
macro_rules! lineage {
    ($attrs:ident) => {
        impl $crate::traits::Lineage for $crate::entity::Entity<$attrs> {
            fn input_to_processes(&self) -> &[$crate::reference::AssetReference] {
                self.specific()
                    .lineage
                    .input_to_processes
                    .as_deref()
                    .unwrap_or(&[])
            }

            fn output_from_processes(&self) -> &[$crate::reference::AssetReference] {
                self.specific()
                    .lineage
                    .output_from_processes
                    .as_deref()
                    .unwrap_or(&[])
            }
        }
    };
}

pub(crate) use asset_type;
pub(crate) use lineage;

mod api_path;
mod api_spec;
mod bi_report;
mod connection;
mod dashboard;
mod glossary_term;
mod persona;
mod process;
mod purpose;
mod table;

pub use api_path::{ApiPath, ApiPathAttributes};
pub use api_spec::{ApiSpec, ApiSpecAttributes};
pub use bi_report::{BiReport, BiReportAttributes};
pub use connection::{Connection, ConnectionAttributes};
pub use dashboard::{Dashboard, DashboardAttributes};
pub use glossary_term::{GlossaryTerm, GlossaryTermAttributes};
pub use persona::{Persona, PersonaAttributes};
pub use process::{Process, ProcessAttributes};
pub use purpose::{Purpose, PurposeAttributes};
pub use table::{Table, TableAttributes};
