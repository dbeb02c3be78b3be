//! Search result formatting

use serde::Serialize;
use serde_json::Value;
use tessera_core::Result;
use tessera_model::Asset;

/// Output format for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            other => Err(format!("unknown format '{}' (expected json or toml)", other)),
        }
    }
}

/// Format assets in the given format
pub fn format_assets(assets: &[Asset], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(assets),
        OutputFormat::Toml => format_toml(assets),
    }
}

/// Format assets as a pretty JSON array
pub fn format_json(assets: &[Asset]) -> Result<String> {
    Ok(serde_json::to_string_pretty(assets)?)
}

/// Format assets as TOML, one `[[assets]]` table each.
///
/// TOML has no null, so null values are dropped.
pub fn format_toml(assets: &[Asset]) -> Result<String> {
    let assets = assets
        .iter()
        .map(|a| serde_json::to_value(a).map(strip_nulls))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let wrapper = AssetListWrapper { assets };
    toml::to_string_pretty(&wrapper)
        .map_err(|e| tessera_core::TesseraError::TomlParse(e.to_string()))
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other,
    }
}

#[derive(Serialize)]
struct AssetListWrapper {
    assets: Vec<Value>,
}
