//! Tessera Client - talking to a metadata catalog
//!
//! - [`CatalogClient`]: the seam every operation goes through, with an
//!   HTTP implementation ([`HttpClient`]) and an in-memory one
//!   ([`InMemoryClient`]) for offline work and tests
//! - [`AssetOps`]: typed get, search, lifecycle and metadata helpers,
//!   implemented for every asset type
//! - [`ClientConfig`]: layered configuration (`~/.tessera/config.toml`,
//!   `.tessera/config.toml`, then `TESSERA_*` environment variables)

mod client;
pub mod config;
mod http;
mod memory;
mod ops;
mod response;

pub use client::{CatalogClient, DeleteType};
pub use config::ClientConfig;
pub use http::HttpClient;
pub use memory::InMemoryClient;
pub use ops::AssetOps;
pub use response::{EntityResponse, MutatedEntities, MutationResponse};
