//! Tessera Model - Typed catalog assets
//!
//! Every asset type is an [`Entity`] over its own attribute struct and gets
//! references, updaters and validation from [`CatalogAsset`]. The
//! [`Asset`] enum holds any of them; the [`TypeRegistry`] decodes server
//! responses into the right variant by `typeName`.

mod asset;
pub mod assets;
mod entity;
mod reference;
mod registry;
mod traits;
mod types;
pub mod wire;

pub use asset::Asset;
pub use assets::{
    ApiPath, ApiPathAttributes, ApiSpec, ApiSpecAttributes, BiReport, BiReportAttributes,
    Connection, ConnectionAttributes, Dashboard, DashboardAttributes, GlossaryTerm,
    GlossaryTermAttributes, LineageAttributes, Persona, PersonaAttributes, Process,
    ProcessAttributes, Purpose, PurposeAttributes, Table, TableAttributes,
};
pub use entity::{Attributes, CommonAttributes, Entity, GenericAttributes};
pub use reference::{AssetReference, ReferenceKey};
pub use registry::{TypeDefinition, TypeRegistry};
pub use traits::{CatalogAsset, Lineage, Referenceable, TypeAttributes};
pub use types::{
    AnnouncementType, CertificateStatus, EntityStatus, SaveSemantic, Tag, UniqueAttributes,
};
