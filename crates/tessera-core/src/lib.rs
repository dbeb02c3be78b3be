//! Tessera Core - Foundational types for the Tessera catalog client
//!
//! This crate provides the types that all other Tessera crates depend on:
//! - `Guid`, `LocalId`, `Identity` - Asset identifiers
//! - `KeyHash` - SHA-256 based keys for generated qualified names
//! - Qualified-name helpers
//! - Error types and Result alias

mod error;
mod hash;
mod id;
pub mod name;

pub use error::{Result, TesseraError};
pub use hash::KeyHash;
pub use id::{is_guid_shaped, Guid, Identity, LocalId};
