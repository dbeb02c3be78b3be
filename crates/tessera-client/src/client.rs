//! The connectivity seam every operation goes through

use crate::response::MutationResponse;
use std::fmt;
use tessera_core::{Guid, Result};
use tessera_model::{Asset, Tag};
use tessera_search::SearchSource;

/// How a delete treats the asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteType {
    /// Archive: the asset stays, with status `DELETED`, and can be restored
    Soft,
    /// Remove the asset
    Hard,
    /// Remove the asset and its audit history
    Purge,
}

impl DeleteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteType::Soft => "SOFT",
            DeleteType::Hard => "HARD",
            DeleteType::Purge => "PURGE",
        }
    }
}

impl fmt::Display for DeleteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle to a metadata catalog.
///
/// Implementations perform one remote call per method and never cache.
/// `Ok(None)` from the getters means the asset does not exist.
pub trait CatalogClient: SearchSource + Send + Sync {
    fn get_by_guid(
        &self,
        guid: &str,
        min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>>;

    fn get_by_qualified_name(
        &self,
        type_name: &str,
        qualified_name: &str,
        min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>>;

    /// Create or update assets. With `replace_tags` the tags on each asset
    /// replace the stored ones; otherwise submitted tags are ignored on
    /// update.
    fn save(&self, assets: &[Asset], replace_tags: bool) -> Result<MutationResponse>;

    /// Append tags to an asset server-side, without reading it first
    fn add_tags(&self, type_name: &str, qualified_name: &str, tags: &[Tag]) -> Result<()>;

    fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse>;

    /// Return archived assets to `ACTIVE`
    fn restore(&self, guids: &[Guid]) -> Result<MutationResponse>;
}
