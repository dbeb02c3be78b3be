//! Error types for Tessera

use thiserror::Error;

/// The main error type for Tessera operations
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("Asset with GUID {0} does not exist")]
    NotFoundByGuid(String),

    #[error("Asset with qualifiedName {qualified_name} of type {type_name} does not exist")]
    NotFoundByQualifiedName {
        type_name: String,
        qualified_name: String,
    },

    #[error("Asset {id} is not of the type requested: {expected}")]
    NotTypeRequested { id: String, expected: String },

    #[error("Missing required relationship parameter for {type_name}: one of {params} must be set")]
    MissingRequiredRelationshipParam { type_name: String, params: String },

    #[error("Missing required update parameter for {type_name}: {}", fields.join(", "))]
    MissingRequiredUpdateParam {
        type_name: String,
        fields: Vec<String>,
    },

    #[error("Unknown asset type: {0}")]
    UnknownType(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl TesseraError {
    /// True for the three resolution failures (not found by guid, not found
    /// by qualified name, wrong type)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TesseraError::NotFoundByGuid(_)
                | TesseraError::NotFoundByQualifiedName { .. }
                | TesseraError::NotTypeRequested { .. }
        )
    }
}

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;

impl From<toml::de::Error> for TesseraError {
    fn from(err: toml::de::Error) -> Self {
        TesseraError::TomlParse(err.to_string())
    }
}
