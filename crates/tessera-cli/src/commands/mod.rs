//! CLI command implementations

pub mod announce;
pub mod archive;
pub mod certify;
pub mod get;
pub mod reference;
pub mod restore;
pub mod search;
pub mod tag;
pub mod term;
pub mod types;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tessera_client::{AssetOps, CatalogClient, ClientConfig, HttpClient, InMemoryClient};
use tessera_model::{CatalogAsset, TypeRegistry};
use tracing::debug;

/// Run `$body` with `$t` bound to the asset type named by `$type_name`.
///
/// Matching is case-insensitive on the wire type name.
macro_rules! with_asset_type {
    ($type_name:expr, $t:ident => $body:expr) => {
        match $type_name.to_ascii_lowercase().as_str() {
            "connection" => {
                type $t = tessera_model::Connection;
                $body
            }
            "table" => {
                type $t = tessera_model::Table;
                $body
            }
            "dashboard" => {
                type $t = tessera_model::Dashboard;
                $body
            }
            "bireport" => {
                type $t = tessera_model::BiReport;
                $body
            }
            "persona" => {
                type $t = tessera_model::Persona;
                $body
            }
            "purpose" => {
                type $t = tessera_model::Purpose;
                $body
            }
            "process" => {
                type $t = tessera_model::Process;
                $body
            }
            "apispec" => {
                type $t = tessera_model::ApiSpec;
                $body
            }
            "apipath" => {
                type $t = tessera_model::ApiPath;
                $body
            }
            "atlasglossaryterm" => {
                type $t = tessera_model::GlossaryTerm;
                $body
            }
            other => anyhow::bail!("Unsupported asset type '{}' (see `tessera types`)", other),
        }
    };
}

pub(crate) use with_asset_type;

/// Where commands send their calls
pub enum Session {
    Remote(HttpClient),
    Offline {
        client: InMemoryClient,
        fixture: PathBuf,
    },
}

impl Session {
    /// Connect using layered configuration, or load a fixture when offline
    pub fn open(offline: Option<&Path>) -> Result<Self> {
        match offline {
            Some(path) => {
                let client = InMemoryClient::from_fixture(path)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?;
                debug!(fixture = %path.display(), assets = client.len(), "offline session");
                Ok(Session::Offline {
                    client,
                    fixture: path.to_path_buf(),
                })
            }
            None => {
                let config = ClientConfig::load().context("Failed to load configuration")?;
                let client = HttpClient::from_config(&config)?;
                debug!(base_url = client.base_url(), "remote session");
                Ok(Session::Remote(client))
            }
        }
    }

    pub fn client(&self) -> &dyn CatalogClient {
        match self {
            Session::Remote(client) => client,
            Session::Offline { client, .. } => client,
        }
    }

    /// Write offline changes back to the fixture
    pub fn persist(&self) -> Result<()> {
        if let Session::Offline { client, fixture } = self {
            client
                .write_fixture(fixture)
                .with_context(|| format!("Failed to write fixture {}", fixture.display()))?;
        }
        Ok(())
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the asset a mutation helper returned, or note that nothing changed
pub(crate) fn print_outcome<T: CatalogAsset>(outcome: Option<T>, qualified_name: &str) -> Result<()> {
    match outcome {
        Some(asset) => print_json(&asset.into_asset()),
        None => {
            eprintln!("No change reported for {}", qualified_name);
            Ok(())
        }
    }
}

/// The minimal updater for `qualified_name`
///
/// A given name is used as is, unless the type needs further fields for a
/// partial update; those (and a missing name) are read from the catalog.
pub(crate) fn resolve_updater<T: AssetOps, C: CatalogClient + ?Sized>(
    client: &C,
    qualified_name: &str,
    name: Option<String>,
) -> Result<T> {
    let required = TypeRegistry::global().required_update_fields(T::TYPE_NAME);
    if let Some(name) = name {
        if required.is_empty() {
            return Ok(T::updater(qualified_name, name));
        }
    }
    let current = T::get(client, Some(qualified_name), false)?;
    current
        .trim_to_required()
        .with_context(|| format!("{} cannot be updated in place", qualified_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_fixture(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tessera_cli_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        fs::write(&path, content).unwrap();
        path
    }

    fn type_name_of(type_name: &str) -> Result<&'static str> {
        with_asset_type!(type_name, T => Ok(<T as CatalogAsset>::TYPE_NAME))
    }

    #[test]
    fn test_type_dispatch_is_case_insensitive() {
        assert_eq!(type_name_of("table").unwrap(), "Table");
        assert_eq!(type_name_of("APIPath").unwrap(), "APIPath");
        assert_eq!(type_name_of("AtlasGlossaryTerm").unwrap(), "AtlasGlossaryTerm");
        assert!(type_name_of("KafkaTopic").is_err());
    }

    #[test]
    fn test_offline_session_roundtrip() {
        let path = temp_fixture(
            r#"{"entities": [{"typeName": "Table", "attributes": {"qualifiedName": "c/db/s/t", "name": "t"}}]}"#,
        );
        let session = Session::open(Some(&path)).unwrap();
        let updater =
            resolve_updater::<tessera_model::Table, _>(session.client(), "c/db/s/t", None).unwrap();
        assert_eq!(updater.name(), Some("t"));

        session.persist().unwrap();
        let reloaded = InMemoryClient::from_fixture(&path).unwrap();
        assert_eq!(reloaded.len(), 1);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_fixture_fails() {
        let path = std::env::temp_dir().join(format!("tessera_cli_missing_{}.json", uuid::Uuid::new_v4()));
        assert!(Session::open(Some(&path)).is_err());
    }

    #[test]
    fn test_updater_keeps_fields_the_type_requires() {
        use tessera_model::{Persona, Table};

        let client = InMemoryClient::new();
        Persona::creator("analysts").save(&client).unwrap();
        let persona = resolve_updater::<Persona, _>(&client, "analysts", Some("analysts".into())).unwrap();
        assert_eq!(persona.specific().is_access_control_enabled, Some(true));

        let table = resolve_updater::<Table, _>(&client, "c/db/s/t", Some("t".into())).unwrap();
        assert_eq!(table.name(), Some("t"));
    }
}
