//! Tessera CLI - inspect and curate catalog assets from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{announce, archive, certify, get, reference, restore, search, tag, term, types};
use commands::Session;
use std::path::PathBuf;
use tessera_model::{AnnouncementType, CertificateStatus, SaveSemantic};
use tessera_search::OutputFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Typed client for a metadata catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Work against a JSON fixture instead of the configured server
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one asset by GUID or qualified name
    Get {
        /// Asset type (e.g. Table, APIPath)
        type_name: String,

        /// GUID or qualified name
        id: String,

        /// Fetch through search, returning only these attributes
        #[arg(long, value_delimiter = ',')]
        attributes: Vec<String>,

        /// Attributes to include on related assets (implies search)
        #[arg(long, value_delimiter = ',')]
        related: Vec<String>,

        /// Include relationship attributes
        #[arg(long)]
        relationships: bool,

        /// Output format (json or toml)
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the reference that would relate an asset elsewhere
    Ref {
        /// Asset type
        type_name: String,

        /// Reference by GUID
        #[arg(long, conflicts_with = "qualified_name", required_unless_present = "qualified_name")]
        guid: Option<String>,

        /// Reference by qualified name
        #[arg(long)]
        qualified_name: Option<String>,

        /// Save semantic (replace, append or remove)
        #[arg(long, default_value = "replace")]
        semantic: SaveSemantic,
    },

    /// Search assets (e.g. "assets where __typeName == 'Table' and name startswith 'ORD'")
    Search {
        /// Query string
        query: String,

        /// Results fetched per request
        #[arg(long)]
        page_size: Option<usize>,

        /// Stop after this many results
        #[arg(long)]
        limit: Option<usize>,

        /// Output format (json or toml)
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Restore an archived asset
    Restore {
        /// Asset type
        type_name: String,

        /// Qualified name
        qualified_name: String,
    },

    /// Archive (soft-delete) an asset
    Archive {
        /// Asset GUID
        guid: String,

        /// Delete permanently instead
        #[arg(long)]
        purge: bool,
    },

    /// Set or remove an asset's certificate
    Certify {
        /// Asset type
        type_name: String,

        /// Qualified name
        qualified_name: String,

        /// VERIFIED, DRAFT or DEPRECATED
        #[arg(required_unless_present = "remove")]
        status: Option<CertificateStatus>,

        /// Certificate message
        #[arg(long)]
        message: Option<String>,

        /// Asset name (looked up when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Remove the certificate
        #[arg(long, conflicts_with = "status")]
        remove: bool,
    },

    /// Set or remove an asset's announcement
    Announce {
        /// Asset type
        type_name: String,

        /// Qualified name
        qualified_name: String,

        /// information, warning or issue
        #[arg(required_unless_present = "remove")]
        kind: Option<AnnouncementType>,

        /// Announcement title
        #[arg(required_unless_present = "remove")]
        title: Option<String>,

        /// Announcement message
        #[arg(long)]
        message: Option<String>,

        /// Asset name (looked up when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Remove the announcement
        #[arg(long, conflicts_with_all = ["kind", "title"])]
        remove: bool,
    },

    /// Tag operations
    #[command(subcommand)]
    Tag(tag::TagCommands),

    /// Glossary term operations
    #[command(subcommand)]
    Term(term::TermCommands),

    /// List the asset types this client knows
    Types,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Pure commands need no connection
    match &cli.command {
        Commands::Ref {
            type_name,
            guid,
            qualified_name,
            semantic,
        } => return reference::run(type_name, guid.as_deref(), qualified_name.as_deref(), *semantic),
        Commands::Types => return types::run(),
        _ => {}
    }

    let session = Session::open(cli.offline.as_deref())?;
    let client = session.client();

    let mutated = match cli.command {
        Commands::Get {
            type_name,
            id,
            attributes,
            related,
            relationships,
            format,
        } => {
            get::run(
                client,
                get::GetArgs {
                    type_name,
                    id,
                    attributes,
                    related,
                    relationships,
                    format,
                },
            )?;
            false
        }
        Commands::Search {
            query,
            page_size,
            limit,
            format,
        } => {
            search::run(client, &query, page_size, limit, format)?;
            false
        }
        Commands::Restore {
            type_name,
            qualified_name,
        } => {
            restore::run(client, &type_name, &qualified_name)?;
            true
        }
        Commands::Archive { guid, purge } => {
            archive::run(client, &guid, purge)?;
            true
        }
        Commands::Certify {
            type_name,
            qualified_name,
            status,
            message,
            name,
            remove,
        } => {
            certify::run(
                client,
                certify::CertifyArgs {
                    type_name,
                    qualified_name,
                    status: if remove { None } else { status },
                    message,
                    name,
                },
            )?;
            true
        }
        Commands::Announce {
            type_name,
            qualified_name,
            kind,
            title,
            message,
            name,
            remove,
        } => {
            let announcement = match (kind, title) {
                (Some(kind), Some(title)) if !remove => Some((kind, title, message)),
                _ => None,
            };
            announce::run(
                client,
                announce::AnnounceArgs {
                    type_name,
                    qualified_name,
                    announcement,
                    name,
                },
            )?;
            true
        }
        Commands::Tag(cmd) => {
            tag::run(client, cmd)?;
            true
        }
        Commands::Term(cmd) => {
            term::run(client, cmd)?;
            true
        }
        Commands::Ref { .. } | Commands::Types => false,
    };

    if mutated {
        session.persist()?;
    }
    Ok(())
}
