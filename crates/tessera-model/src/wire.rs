//! Save payload encoding
//!
//! A plain serialization of an asset treats every relationship collection
//! as a full replacement. Before saving, references carrying the append or
//! remove semantic are moved out of `attributes` into
//! `appendRelationshipAttributes` / `removeRelationshipAttributes`, and
//! fields marked with [`Entity::null_field`](crate::Entity::null_field) are
//! sent as explicit `null`.

use crate::asset::Asset;
use crate::types::SaveSemantic;
use serde_json::{Map, Value};
use tessera_core::Result;

pub const APPEND_KEY: &str = "appendRelationshipAttributes";
pub const REMOVE_KEY: &str = "removeRelationshipAttributes";

/// Encode an asset as the entity payload of a save request
pub fn encode_for_save(asset: &Asset) -> Result<Value> {
    let mut value = serde_json::to_value(asset)?;
    let Some(object) = value.as_object_mut() else {
        return Ok(value);
    };

    let mut attributes = match object.remove("attributes") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let mut append = Map::new();
    let mut remove = Map::new();
    let keys: Vec<String> = attributes.keys().cloned().collect();
    for key in keys {
        let Some(field) = attributes.remove(&key) else {
            continue;
        };
        let split = partition(field);
        if let Some(items) = split.append {
            append.insert(key.clone(), items);
        }
        if let Some(items) = split.remove {
            remove.insert(key.clone(), items);
        }
        if let Some(kept) = split.replace {
            attributes.insert(key, kept);
        }
    }

    for field in asset.null_fields() {
        attributes.insert(field.clone(), Value::Null);
    }

    object.insert("attributes".to_string(), Value::Object(attributes));
    if !append.is_empty() {
        object.insert(APPEND_KEY.to_string(), Value::Object(append));
    }
    if !remove.is_empty() {
        object.insert(REMOVE_KEY.to_string(), Value::Object(remove));
    }
    Ok(value)
}

#[derive(Default)]
struct Split {
    replace: Option<Value>,
    append: Option<Value>,
    remove: Option<Value>,
}

fn semantic_of(value: &Value) -> Option<SaveSemantic> {
    let object = value.as_object()?;
    object.get("typeName")?;
    serde_json::from_value(object.get("semantic")?.clone()).ok()
}

fn strip_semantic(mut value: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        object.remove("semantic");
    }
    value
}

fn partition(field: Value) -> Split {
    match field {
        Value::Array(items) if !items.is_empty() => {
            let mut replace = Vec::new();
            let mut append = Vec::new();
            let mut remove = Vec::new();
            for item in items {
                match semantic_of(&item) {
                    Some(SaveSemantic::Append) => append.push(strip_semantic(item)),
                    Some(SaveSemantic::Remove) => remove.push(strip_semantic(item)),
                    _ => replace.push(strip_semantic(item)),
                }
            }
            // A collection holding only append/remove references must not
            // also be sent as an (empty) replacement.
            Split {
                replace: (!replace.is_empty()).then_some(Value::Array(replace)),
                append: (!append.is_empty()).then_some(Value::Array(append)),
                remove: (!remove.is_empty()).then_some(Value::Array(remove)),
            }
        }
        single => match semantic_of(&single) {
            Some(SaveSemantic::Append) => Split {
                append: Some(strip_semantic(single)),
                ..Split::default()
            },
            Some(SaveSemantic::Remove) => Split {
                remove: Some(strip_semantic(single)),
                ..Split::default()
            },
            _ => Split {
                replace: Some(single),
                ..Split::default()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{GlossaryTerm, Table};
    use crate::traits::CatalogAsset;
    use serde_json::json;

    #[test]
    fn test_plain_asset_unchanged() {
        let asset = Table::updater("c/db/s/t", "t").into_asset();
        let value = encode_for_save(&asset).unwrap();
        assert_eq!(
            value,
            json!({
                "typeName": "Table",
                "attributes": {"qualifiedName": "c/db/s/t", "name": "t"}
            })
        );
    }

    #[test]
    fn test_append_terms_move_out_of_attributes() {
        let asset = Table::updater("c/db/s/t", "t")
            .with_meanings(vec![
                GlossaryTerm::ref_by_guid_with("g-1", SaveSemantic::Append),
                GlossaryTerm::ref_by_guid_with("g-2", SaveSemantic::Append),
            ])
            .into_asset();
        let value = encode_for_save(&asset).unwrap();
        assert!(value["attributes"].get("meanings").is_none());
        assert_eq!(
            value[APPEND_KEY]["meanings"],
            json!([
                {"typeName": "AtlasGlossaryTerm", "guid": "g-1"},
                {"typeName": "AtlasGlossaryTerm", "guid": "g-2"}
            ])
        );
        assert!(value.get(REMOVE_KEY).is_none());
    }

    #[test]
    fn test_mixed_semantics_split() {
        let asset = Table::updater("c/db/s/t", "t")
            .with_meanings(vec![
                GlossaryTerm::ref_by_guid("keep"),
                GlossaryTerm::ref_by_guid_with("gone", SaveSemantic::Remove),
            ])
            .into_asset();
        let value = encode_for_save(&asset).unwrap();
        assert_eq!(
            value["attributes"]["meanings"],
            json!([{"typeName": "AtlasGlossaryTerm", "guid": "keep"}])
        );
        assert_eq!(
            value[REMOVE_KEY]["meanings"],
            json!([{"typeName": "AtlasGlossaryTerm", "guid": "gone"}])
        );
    }

    #[test]
    fn test_empty_collection_is_an_explicit_clear() {
        let asset = Table::updater("c/db/s/t", "t")
            .with_meanings(vec![])
            .into_asset();
        let value = encode_for_save(&asset).unwrap();
        assert_eq!(value["attributes"]["meanings"], json!([]));
    }

    #[test]
    fn test_null_fields_sent_as_null() {
        let mut table = Table::updater("c/db/s/t", "t");
        table.null_field("description");
        let value = encode_for_save(&table.into_asset()).unwrap();
        assert_eq!(value["attributes"].get("description"), Some(&Value::Null));
    }
}
