//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `TESSERA_BASE_URL`, `TESSERA_API_KEY`,
//!    `TESSERA_TIMEOUT_SECS`, `TESSERA_MAX_RETRIES`
//! 2. Project-local: `.tessera/config.toml`
//! 3. Global: `~/.tessera/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tessera_core::{Result, TesseraError};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// The `[client]` table of a config file. Every field is optional so that
/// layers only override what they set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<usize>,
    #[serde(default)]
    pub retry_base_delay_ms: Option<u64>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfigFile {
    #[serde(default)]
    pub client: ClientSection,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Retries after the first attempt, for transport failures and 429/5xx
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

impl ClientConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ClientConfigFile::default();

        // Layer 1: Global config (~/.tessera/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        // Layer 2: Project-local config (.tessera/config.toml)
        let local_path = PathBuf::from(".tessera/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        Ok(Self::resolve(config))
    }

    /// Load config from a specific file path only, then apply env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(Self::resolve(config))
    }

    /// A config pointing at `base_url`, everything else defaulted
    pub fn for_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_key,
            ..Self::default()
        }
    }

    /// The base URL without a trailing slash
    pub fn require_base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                TesseraError::Config(
                    "base URL not configured. Set TESSERA_BASE_URL or add base_url to .tessera/config.toml".to_string(),
                )
            })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tessera").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ClientConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfigFile = toml::from_str(&content).map_err(|e| {
            TesseraError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut ClientConfigFile, overlay: ClientConfigFile) {
        let (base, overlay) = (&mut base.client, overlay.client);
        if overlay.base_url.is_some() {
            base.base_url = overlay.base_url;
        }
        if overlay.api_key.is_some() {
            base.api_key = overlay.api_key;
        }
        if overlay.timeout_secs.is_some() {
            base.timeout_secs = overlay.timeout_secs;
        }
        if overlay.max_retries.is_some() {
            base.max_retries = overlay.max_retries;
        }
        if overlay.retry_base_delay_ms.is_some() {
            base.retry_base_delay_ms = overlay.retry_base_delay_ms;
        }
    }

    fn apply_env_overrides(
        config: &mut ClientConfigFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        let client = &mut config.client;
        if let Some(url) = lookup("TESSERA_BASE_URL") {
            client.base_url = Some(url);
        }
        if let Some(key) = lookup("TESSERA_API_KEY") {
            client.api_key = Some(key);
        }
        if let Some(secs) = lookup("TESSERA_TIMEOUT_SECS") {
            client.timeout_secs = Some(parse_env("TESSERA_TIMEOUT_SECS", &secs)?);
        }
        if let Some(retries) = lookup("TESSERA_MAX_RETRIES") {
            client.max_retries = Some(parse_env("TESSERA_MAX_RETRIES", &retries)?);
        }
        Ok(())
    }

    fn resolve(file: ClientConfigFile) -> Self {
        let client = file.client;
        Self {
            base_url: client.base_url,
            api_key: client.api_key,
            timeout_secs: client.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: client.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_base_delay_ms: client
                .retry_base_delay_ms
                .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TesseraError::Config(format!("{} must be a number, got '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tessera_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_file_and_defaults() {
        let path = temp_config(
            r#"
[client]
base_url = "https://tenant.example.com/"
api_key = "file-key"
max_retries = 5
"#,
        );
        let file = ClientConfig::load_file(&path).unwrap();
        let config = ClientConfig::resolve(file);

        assert_eq!(config.require_base_url().unwrap(), "https://tenant.example.com");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.retry_base_delay_ms, DEFAULT_RETRY_BASE_DELAY_MS);
        cleanup(&path);
    }

    #[test]
    fn test_project_layer_overrides_global() {
        let mut base = ClientConfigFile::default();
        base.client.base_url = Some("https://global".to_string());
        base.client.api_key = Some("global-key".to_string());

        let mut overlay = ClientConfigFile::default();
        overlay.client.base_url = Some("https://project".to_string());

        ClientConfig::merge_into(&mut base, overlay);
        assert_eq!(base.client.base_url.as_deref(), Some("https://project"));
        assert_eq!(base.client.api_key.as_deref(), Some("global-key"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TESSERA_API_KEY", "env-key"),
            ("TESSERA_TIMEOUT_SECS", "15"),
        ]
        .into_iter()
        .collect();
        let mut file = ClientConfigFile::default();
        file.client.api_key = Some("file-key".to_string());

        ClientConfig::apply_env_overrides(&mut file, |k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        let config = ClientConfig::resolve(file);
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_bad_env_number() {
        let mut file = ClientConfigFile::default();
        let err = ClientConfig::apply_env_overrides(&mut file, |k| {
            (k == "TESSERA_MAX_RETRIES").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, TesseraError::Config(_)));
    }

    #[test]
    fn test_missing_base_url() {
        let config = ClientConfig::default();
        assert!(matches!(
            config.require_base_url(),
            Err(TesseraError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_config("[client\nbase_url = 1");
        assert!(ClientConfig::load_file(&path).is_err());
        cleanup(&path);
    }
}
