//! Restore command

use super::{print_json, with_asset_type};
use anyhow::Result;
use serde_json::json;
use tessera_client::{AssetOps, CatalogClient};

pub fn run(client: &dyn CatalogClient, type_name: &str, qualified_name: &str) -> Result<()> {
    let restored = with_asset_type!(type_name, T => T::restore(client, qualified_name)?);
    if !restored {
        eprintln!("No {} found with qualified name {}", type_name, qualified_name);
    }
    print_json(&json!({ "qualifiedName": qualified_name, "restored": restored }))
}
