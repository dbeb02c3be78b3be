//! Capability traits shared by asset types
//!
//! - [`Referenceable`]: anything with an identity that can be trimmed to a
//!   relationship reference.
//! - [`TypeAttributes`]: the per-type hook a concrete attribute struct
//!   implements (type name, required update fields, narrowing).
//! - [`CatalogAsset`]: the typed template every concrete asset gets for
//!   free from its `TypeAttributes`: references, updaters, trimming.
//! - [`Lineage`]: assets that can be inputs or outputs of processes.

use crate::asset::{with_entity, Asset};
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::types::{SaveSemantic, UniqueAttributes};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tessera_core::{Identity, Result, TesseraError};

/// Fields named when a reference cannot be built
const REFERENCE_PARAMS: &str = "guid, qualifiedName";

/// An asset (or asset-shaped value) with an identity
pub trait Referenceable {
    fn type_name(&self) -> &str;
    fn guid(&self) -> Option<&Identity>;
    fn qualified_name(&self) -> Option<&str>;
    fn unique_attributes(&self) -> Option<&UniqueAttributes>;
    fn semantic(&self) -> SaveSemantic;

    /// The minimal reference needed to relate this asset elsewhere.
    ///
    /// Precedence: guid, then qualified name, then the qualified name held
    /// under unique attributes.
    fn trim_to_reference(&self) -> Result<AssetReference> {
        let reference = if let Some(guid) = self.guid() {
            AssetReference::by_guid(self.type_name(), guid.clone())
        } else if let Some(qualified_name) = self.qualified_name() {
            AssetReference::by_qualified_name(self.type_name(), qualified_name)
        } else if let Some(unique) = self.unique_attributes() {
            AssetReference::by_qualified_name(self.type_name(), unique.qualified_name.clone())
        } else {
            return Err(TesseraError::MissingRequiredRelationshipParam {
                type_name: self.type_name().to_string(),
                params: REFERENCE_PARAMS.to_string(),
            });
        };
        Ok(reference.with_semantic(self.semantic()))
    }
}

impl<A> Referenceable for Entity<A> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn guid(&self) -> Option<&Identity> {
        self.guid.as_ref()
    }

    fn qualified_name(&self) -> Option<&str> {
        self.attributes.common.qualified_name.as_deref()
    }

    fn unique_attributes(&self) -> Option<&UniqueAttributes> {
        self.unique_attributes.as_ref()
    }

    fn semantic(&self) -> SaveSemantic {
        self.semantic
    }
}

/// Per-type hook implemented by each concrete attribute struct
pub trait TypeAttributes:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The fixed `typeName` discriminator
    const TYPE_NAME: &'static str;

    /// Type-specific fields an update must carry, beyond qualified name and name
    const REQUIRED_FOR_UPDATE: &'static [&'static str] = &[];

    /// Which of [`Self::REQUIRED_FOR_UPDATE`] are unset
    fn missing_required(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Keep only the fields an updater must re-assert
    fn retain_required(&self) -> Self {
        Self::default()
    }

    fn wrap(entity: Entity<Self>) -> Asset;

    fn narrow(asset: Asset) -> std::result::Result<Entity<Self>, Asset>;
}

/// The typed template shared by every concrete asset type
pub trait CatalogAsset: Referenceable + Clone + Debug + Sized {
    const TYPE_NAME: &'static str;

    /// An empty instance carrying only the type name
    fn blank() -> Self;

    /// The smallest payload that updates an existing asset
    fn updater(qualified_name: impl Into<String>, name: impl Into<String>) -> Self;

    /// Validate the fields an update requires, then reduce to an updater.
    ///
    /// Fails before any remote call when a required field is unset, naming
    /// every missing field.
    fn trim_to_required(&self) -> Result<Self>;

    fn into_asset(self) -> Asset;

    /// Narrow a generic asset, handing it back unchanged on a type mismatch
    fn from_asset(asset: Asset) -> std::result::Result<Self, Asset>;

    fn ref_by_guid(guid: impl Into<Identity>) -> AssetReference {
        AssetReference::by_guid(Self::TYPE_NAME, guid)
    }

    fn ref_by_guid_with(guid: impl Into<Identity>, semantic: SaveSemantic) -> AssetReference {
        Self::ref_by_guid(guid).with_semantic(semantic)
    }

    fn ref_by_qualified_name(qualified_name: impl Into<String>) -> AssetReference {
        AssetReference::by_qualified_name(Self::TYPE_NAME, qualified_name)
    }

    fn ref_by_qualified_name_with(
        qualified_name: impl Into<String>,
        semantic: SaveSemantic,
    ) -> AssetReference {
        Self::ref_by_qualified_name(qualified_name).with_semantic(semantic)
    }

    /// The minimal instance a reference denotes
    fn from_reference(reference: &AssetReference) -> Self;
}

impl<A: TypeAttributes> CatalogAsset for Entity<A> {
    const TYPE_NAME: &'static str = A::TYPE_NAME;

    fn blank() -> Self {
        Entity::of_type(A::TYPE_NAME)
    }

    fn updater(qualified_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::blank()
            .with_qualified_name(qualified_name)
            .with_name(name)
    }

    fn trim_to_required(&self) -> Result<Self> {
        let common = &self.attributes.common;
        let mut missing = Vec::new();
        if common.qualified_name.is_none() {
            missing.push("qualifiedName".to_string());
        }
        if common.name.is_none() {
            missing.push("name".to_string());
        }
        missing.extend(
            self.attributes
                .specific
                .missing_required()
                .into_iter()
                .map(String::from),
        );

        match (&common.qualified_name, &common.name) {
            (Some(qualified_name), Some(name)) if missing.is_empty() => {
                let mut updater = Self::updater(qualified_name.clone(), name.clone());
                updater.attributes.specific = self.attributes.specific.retain_required();
                Ok(updater)
            }
            _ => Err(TesseraError::MissingRequiredUpdateParam {
                type_name: A::TYPE_NAME.to_string(),
                fields: missing,
            }),
        }
    }

    fn into_asset(self) -> Asset {
        A::wrap(self)
    }

    fn from_asset(asset: Asset) -> std::result::Result<Self, Asset> {
        A::narrow(asset)
    }

    fn from_reference(reference: &AssetReference) -> Self {
        let mut entity = Self::blank();
        match reference.guid() {
            Some(guid) => entity.guid = Some(guid.clone()),
            None => {
                entity.unique_attributes = reference
                    .qualified_name()
                    .map(UniqueAttributes::new);
            }
        }
        entity.semantic = reference.semantic;
        entity
    }
}

/// Assets that take part in process lineage
pub trait Lineage {
    /// Processes this asset feeds into
    fn input_to_processes(&self) -> &[AssetReference];
    /// Processes that produce this asset
    fn output_from_processes(&self) -> &[AssetReference];

    fn has_lineage(&self) -> bool {
        !self.input_to_processes().is_empty() || !self.output_from_processes().is_empty()
    }
}

impl Referenceable for Asset {
    fn type_name(&self) -> &str {
        with_entity!(self, e => e.type_name())
    }

    fn guid(&self) -> Option<&Identity> {
        with_entity!(self, e => e.guid())
    }

    fn qualified_name(&self) -> Option<&str> {
        with_entity!(self, e => Referenceable::qualified_name(e))
    }

    fn unique_attributes(&self) -> Option<&UniqueAttributes> {
        with_entity!(self, e => e.unique_attributes())
    }

    fn semantic(&self) -> SaveSemantic {
        with_entity!(self, e => e.semantic())
    }
}
