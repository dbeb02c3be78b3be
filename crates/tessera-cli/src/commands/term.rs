//! Glossary term commands

use super::{print_outcome, resolve_updater, with_asset_type};
use anyhow::Result;
use clap::Subcommand;
use tessera_client::{AssetOps, CatalogClient};
use tessera_model::{AssetReference, CatalogAsset, GlossaryTerm};

#[derive(Subcommand)]
pub enum TermCommands {
    /// Assign terms in addition to the current ones
    Append {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Term GUIDs
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Unassign terms
    Remove {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Term GUIDs
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Replace every assigned term (no GUIDs removes them all)
    Replace {
        /// Asset type
        type_name: String,
        /// Qualified name
        qualified_name: String,
        /// Term GUIDs
        terms: Vec<String>,
        /// Asset name (looked up when omitted)
        #[arg(long)]
        name: Option<String>,
    },
}

fn term_refs(guids: &[String]) -> Vec<AssetReference> {
    guids.iter().map(|g| GlossaryTerm::ref_by_guid(g.as_str())).collect()
}

pub fn run(client: &dyn CatalogClient, cmd: TermCommands) -> Result<()> {
    match cmd {
        TermCommands::Append {
            type_name,
            qualified_name,
            terms,
        } => with_asset_type!(type_name, T => {
            let outcome = T::append_terms(client, &qualified_name, term_refs(&terms))?;
            print_outcome(outcome, &qualified_name)
        }),
        TermCommands::Remove {
            type_name,
            qualified_name,
            terms,
        } => with_asset_type!(type_name, T => {
            let outcome = T::remove_terms(client, &qualified_name, &term_refs(&terms))?;
            print_outcome(outcome, &qualified_name)
        }),
        TermCommands::Replace {
            type_name,
            qualified_name,
            terms,
            name,
        } => with_asset_type!(type_name, T => {
            let updater = resolve_updater::<T, _>(client, &qualified_name, name)?;
            let outcome = T::replace_terms(client, updater, term_refs(&terms))?;
            print_outcome(outcome, &qualified_name)
        }),
    }
}
