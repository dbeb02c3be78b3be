//! Tag commands

use super::{print_outcome, with_asset_type};
use anyhow::Result;
use clap::Subcommand;
use tessera_client::{AssetOps, CatalogClient};
use tessera_model::Tag;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Append tags server-side without reading the asset
    Add {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Append tags by reading, merging and writing back the asset
    Append {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove tags
    Remove {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

pub fn run(client: &dyn CatalogClient, cmd: TagCommands) -> Result<()> {
    match cmd {
        TagCommands::Add {
            type_name,
            qualified_name,
            tags,
        } => {
            let tags: Vec<Tag> = tags.into_iter().map(Tag::new).collect();
            with_asset_type!(type_name, T => T::add_tags(client, &qualified_name, &tags)?);
            println!("Added {} tag(s) to {}", tags.len(), qualified_name);
            Ok(())
        }
        TagCommands::Append {
            type_name,
            qualified_name,
            tags,
        } => {
            let tags: Vec<Tag> = tags.into_iter().map(Tag::new).collect();
            with_asset_type!(type_name, T => {
                let outcome = T::append_tags(client, &qualified_name, tags)?;
                print_outcome(outcome, &qualified_name)
            })
        }
        TagCommands::Remove {
            type_name,
            qualified_name,
            tags,
        } => with_asset_type!(type_name, T => remove_tags::<T>(client, &qualified_name, &tags)),
    }
}

fn remove_tags<T: AssetOps>(
    client: &dyn CatalogClient,
    qualified_name: &str,
    tags: &[String],
) -> Result<()> {
    let mut outcome = None;
    for tag in tags {
        outcome = T::remove_tag(client, qualified_name, tag)?.or(outcome);
    }
    print_outcome(outcome, qualified_name)
}
