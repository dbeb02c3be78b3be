//! Blocking HTTP client for the catalog REST API

use crate::client::{CatalogClient, DeleteType};
use crate::config::ClientConfig;
use crate::response::{EntityResponse, MutationResponse};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tessera_core::{Guid, Result, TesseraError};
use tessera_model::wire::encode_for_save;
use tessera_model::{Asset, Tag};
use tessera_search::{IndexSearchRequest, SearchPage, SearchSource};
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::Body;

const ENTITY_PATH: &str = "/api/meta/entity";
const SEARCH_PATH: &str = "/api/meta/search/indexsearch";

/// Client for a remote catalog.
///
/// Transport failures and 429/5xx responses are retried with exponential
/// backoff; every other failure is returned immediately.
pub struct HttpClient {
    base_url: String,
    api_key: Option<String>,
    agent: ureq::Agent,
    max_retries: usize,
    retry_base_delay_ms: u64,
}

impl HttpClient {
    /// Create a new HttpClient from config
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let base_url = config.require_base_url()?.to_string();
        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            agent: build_agent(config.timeout_secs),
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| format!("Bearer {}", key))
    }

    /// Run a request, retrying retryable failures
    fn execute<F>(&self, method: &str, path: &str, send: F) -> Result<Response<Body>>
    where
        F: Fn(&ureq::Agent, &str, Option<&str>) -> std::result::Result<Response<Body>, ureq::Error>,
    {
        let url = self.url(path);
        let auth = self.auth_header();
        let mut attempt = 0;
        loop {
            debug!(method, path, attempt, "catalog request");
            match send(&self.agent, &url, auth.as_deref()) {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && is_retryable_error(&e) => {
                    warn!(method, path, attempt, error = %e, "retrying catalog request");
                    sleep_backoff(self.retry_base_delay_ms, attempt);
                    attempt += 1;
                }
                Err(e) => return Err(map_error(method, path, e)),
            }
        }
    }

    fn read_json<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T> {
        response
            .body_mut()
            .read_json::<T>()
            .map_err(|e| TesseraError::Transport(format!("Failed to read response: {}", e)))
    }

    fn get_entity(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Asset>> {
        let result = self.execute("GET", path, |agent, url, auth| {
            let mut request = agent.get(url);
            if let Some(auth) = auth {
                request = request.header("Authorization", auth);
            }
            for (key, value) in query {
                request = request.query(*key, value);
            }
            request.call()
        });

        match result {
            Ok(response) => Ok(Some(Self::read_json::<EntityResponse>(response)?.entity)),
            Err(TesseraError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> Result<T> {
        let response = self.execute("POST", path, |agent, url, auth| {
            let mut request = agent.post(url).header("Content-Type", "application/json");
            if let Some(auth) = auth {
                request = request.header("Authorization", auth);
            }
            for (key, value) in query {
                request = request.query(*key, value);
            }
            request.send_json(body)
        })?;
        Self::read_json(response)
    }
}

impl SearchSource for HttpClient {
    fn search(&self, request: &IndexSearchRequest) -> Result<SearchPage> {
        let body = serde_json::to_value(request)?;
        self.post_json(SEARCH_PATH, &[], &body)
    }
}

impl CatalogClient for HttpClient {
    fn get_by_guid(
        &self,
        guid: &str,
        min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>> {
        let path = format!("{}/guid/{}", ENTITY_PATH, guid);
        self.get_entity(
            &path,
            &[
                ("minExtInfo", min_ext_info.to_string()),
                ("ignoreRelationships", ignore_relationships.to_string()),
            ],
        )
    }

    fn get_by_qualified_name(
        &self,
        type_name: &str,
        qualified_name: &str,
        min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>> {
        let path = format!("{}/uniqueAttribute/type/{}", ENTITY_PATH, type_name);
        self.get_entity(
            &path,
            &[
                ("attr:qualifiedName", qualified_name.to_string()),
                ("minExtInfo", min_ext_info.to_string()),
                ("ignoreRelationships", ignore_relationships.to_string()),
            ],
        )
    }

    fn save(&self, assets: &[Asset], replace_tags: bool) -> Result<MutationResponse> {
        let entities = assets
            .iter()
            .map(encode_for_save)
            .collect::<Result<Vec<_>>>()?;
        let path = format!("{}/bulk", ENTITY_PATH);
        self.post_json(
            &path,
            &[
                ("replaceClassifications", replace_tags.to_string()),
                ("replaceBusinessAttributes", "false".to_string()),
            ],
            &json!({ "entities": entities }),
        )
    }

    fn add_tags(&self, type_name: &str, qualified_name: &str, tags: &[Tag]) -> Result<()> {
        let path = format!(
            "{}/uniqueAttribute/type/{}/classifications",
            ENTITY_PATH, type_name
        );
        let body = serde_json::to_value(tags)?;
        self.execute("POST", &path, |agent, url, auth| {
            let mut request = agent
                .post(url)
                .header("Content-Type", "application/json")
                .query("attr:qualifiedName", qualified_name);
            if let Some(auth) = auth {
                request = request.header("Authorization", auth);
            }
            request.send_json(&body)
        })?;
        Ok(())
    }

    fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse> {
        let path = format!("{}/bulk", ENTITY_PATH);
        let response = self.execute("DELETE", &path, |agent, url, auth| {
            let mut request = agent.delete(url);
            if let Some(auth) = auth {
                request = request.header("Authorization", auth);
            }
            for guid in guids {
                request = request.query("guid", guid.as_str());
            }
            request.query("deleteType", delete_type.as_str()).call()
        })?;
        Self::read_json(response)
    }

    fn restore(&self, guids: &[Guid]) -> Result<MutationResponse> {
        let path = format!("{}/restore/bulk", ENTITY_PATH);
        let response = self.execute("POST", &path, |agent, url, auth| {
            let mut request = agent.post(url);
            if let Some(auth) = auth {
                request = request.header("Authorization", auth);
            }
            for guid in guids {
                request = request.query("guid", guid.as_str());
            }
            request.send_empty()
        })?;
        Self::read_json(response)
    }
}

fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build();
    config.into()
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => true,
        ureq::Error::StatusCode(code) => is_retryable_status(*code),
        _ => false,
    }
}

fn is_retryable_status(code: u16) -> bool {
    matches!(code, 429 | 500 | 502 | 503 | 504)
}

fn backoff_delay(base_delay_ms: u64, attempt: usize) -> Duration {
    let shift = attempt.min(16) as u32;
    Duration::from_millis(base_delay_ms.saturating_mul(1u64 << shift))
}

fn sleep_backoff(base_delay_ms: u64, attempt: usize) {
    std::thread::sleep(backoff_delay(base_delay_ms, attempt));
}

fn map_error(method: &str, path: &str, e: ureq::Error) -> TesseraError {
    match e {
        ureq::Error::StatusCode(status) => TesseraError::Api {
            status,
            message: format!("{} {} failed", method, path),
        },
        other => TesseraError::Transport(format!("{} {} failed: {}", method, path, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_base_url() {
        assert!(matches!(
            HttpClient::from_config(&ClientConfig::default()),
            Err(TesseraError::Config(_))
        ));
    }

    #[test]
    fn test_urls_and_auth() {
        let config = ClientConfig::for_url("https://tenant.example.com/", Some("k".to_string()));
        let client = HttpClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://tenant.example.com");
        assert_eq!(
            client.url(SEARCH_PATH),
            "https://tenant.example.com/api/meta/search/indexsearch"
        );
        assert_eq!(client.auth_header().as_deref(), Some("Bearer k"));
    }

    #[test]
    fn test_retry_policy() {
        assert!(is_retryable_error(&ureq::Error::StatusCode(503)));
        assert!(is_retryable_error(&ureq::Error::StatusCode(429)));
        assert!(is_retryable_error(&ureq::Error::HostNotFound));
        assert!(!is_retryable_error(&ureq::Error::StatusCode(404)));
        assert!(!is_retryable_error(&ureq::Error::StatusCode(400)));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(500, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(4000));
    }

    #[test]
    fn test_status_maps_to_api_error() {
        let err = map_error("GET", "/api/meta/entity/guid/x", ureq::Error::StatusCode(404));
        assert!(matches!(err, TesseraError::Api { status: 404, .. }));
        let err = map_error("GET", "/x", ureq::Error::ConnectionFailed);
        assert!(matches!(err, TesseraError::Transport(_)));
    }

    #[test]
    #[ignore = "opens a local socket"]
    fn test_unreachable_host_fails_without_hanging() {
        let mut config = ClientConfig::for_url("http://127.0.0.1:9", None);
        config.max_retries = 0;
        config.timeout_secs = 2;
        let client = HttpClient::from_config(&config).unwrap();
        let result = client.get_by_guid("6f1e2a8c-8a44-4d6e-9d0b-2f4c1b7e9a10", true, true);
        assert!(matches!(result, Err(TesseraError::Transport(_))));
    }
}
