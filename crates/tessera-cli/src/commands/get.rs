//! Get command

use super::with_asset_type;
use anyhow::Result;
use tessera_client::{AssetOps, CatalogClient};
use tessera_model::CatalogAsset;
use tessera_search::{format_assets, OutputFormat};

pub struct GetArgs {
    pub type_name: String,
    pub id: String,
    pub attributes: Vec<String>,
    pub related: Vec<String>,
    pub relationships: bool,
    pub format: OutputFormat,
}

pub fn run(client: &dyn CatalogClient, args: GetArgs) -> Result<()> {
    let asset = with_asset_type!(args.type_name, T => fetch::<T>(client, &args)?.into_asset());
    println!("{}", format_assets(&[asset], args.format)?);
    Ok(())
}

fn fetch<T: AssetOps>(client: &dyn CatalogClient, args: &GetArgs) -> Result<T> {
    let id = Some(args.id.as_str());
    if args.attributes.is_empty() && args.related.is_empty() {
        return Ok(T::get(client, id, args.relationships)?);
    }
    let attributes: Vec<&str> = args.attributes.iter().map(String::as_str).collect();
    let related: Vec<&str> = args.related.iter().map(String::as_str).collect();
    Ok(T::get_with(client, id, &attributes, &related)?)
}
