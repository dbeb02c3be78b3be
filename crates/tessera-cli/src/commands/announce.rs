//! Announce command

use super::{print_outcome, resolve_updater, with_asset_type};
use anyhow::Result;
use tessera_client::{AssetOps, CatalogClient};
use tessera_model::AnnouncementType;

pub struct AnnounceArgs {
    pub type_name: String,
    pub qualified_name: String,
    /// Kind, title and message; `None` removes the announcement
    pub announcement: Option<(AnnouncementType, String, Option<String>)>,
    pub name: Option<String>,
}

pub fn run(client: &dyn CatalogClient, args: AnnounceArgs) -> Result<()> {
    with_asset_type!(args.type_name, T => announce::<T>(client, &args))
}

fn announce<T: AssetOps>(client: &dyn CatalogClient, args: &AnnounceArgs) -> Result<()> {
    let qualified_name = args.qualified_name.as_str();
    let updater = resolve_updater::<T, _>(client, qualified_name, args.name.clone())?;
    let outcome = match &args.announcement {
        Some((kind, title, message)) => {
            T::update_announcement(client, updater, *kind, title, message.as_deref())?
        }
        None => T::remove_announcement(client, updater)?,
    };
    print_outcome(outcome, qualified_name)
}
