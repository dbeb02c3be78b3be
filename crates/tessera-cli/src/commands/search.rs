//! Search command

use anyhow::{Context, Result};
use tessera_client::CatalogClient;
use tessera_search::{format_assets, parse_search, OutputFormat};

pub fn run(
    client: &dyn CatalogClient,
    query: &str,
    page_size: Option<usize>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut search = parse_search(query).context("Failed to parse query")?;
    if let Some(size) = page_size {
        search = search.page_size(size);
    }
    if let Some(limit) = limit {
        search = search.limit(limit);
    }

    let assets = search.collect_all(client).context("Search failed")?;
    println!("{}", format_assets(&assets, format)?);
    Ok(())
}
