//! Ref command: print the reference form of an asset

use super::{print_json, with_asset_type};
use anyhow::{bail, Result};
use tessera_model::{AssetReference, CatalogAsset, SaveSemantic};

pub fn run(
    type_name: &str,
    guid: Option<&str>,
    qualified_name: Option<&str>,
    semantic: SaveSemantic,
) -> Result<()> {
    let reference = with_asset_type!(type_name, T => build::<T>(guid, qualified_name, semantic)?);
    print_json(&reference)
}

fn build<T: CatalogAsset>(
    guid: Option<&str>,
    qualified_name: Option<&str>,
    semantic: SaveSemantic,
) -> Result<AssetReference> {
    match (guid, qualified_name) {
        (Some(guid), _) => Ok(T::ref_by_guid_with(guid, semantic)),
        (None, Some(qualified_name)) => Ok(T::ref_by_qualified_name_with(qualified_name, semantic)),
        (None, None) => bail!("Either --guid or --qualified-name is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::Table;

    #[test]
    fn test_guid_wins() {
        let reference = build::<Table>(Some("g-1"), Some("c/t"), SaveSemantic::Append).unwrap();
        assert_eq!(reference, Table::ref_by_guid_with("g-1", SaveSemantic::Append));
    }

    #[test]
    fn test_requires_a_key() {
        assert!(build::<Table>(None, None, SaveSemantic::Replace).is_err());
    }
}
