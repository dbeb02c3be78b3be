//! Archive command

use super::print_json;
use anyhow::Result;
use tessera_client::{CatalogClient, DeleteType};
use tessera_core::Guid;

pub fn run(client: &dyn CatalogClient, guid: &str, purge: bool) -> Result<()> {
    let delete_type = if purge {
        DeleteType::Purge
    } else {
        DeleteType::Soft
    };
    let response = client.delete(&[Guid::new(guid)], delete_type)?;
    print_json(&response)
}
