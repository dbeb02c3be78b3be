//! Query evaluation against an asset's JSON form
//!
//! Used by the in-memory client to answer index searches locally.

use crate::query::{
    Condition, Operator, QueryValue, SortItem, SortOrder, GUID_FIELD, STATE_FIELD,
    TAG_NAMES_FIELD, TYPE_NAME_FIELD,
};
use crate::request::IndexSearchRequest;
use serde_json::Value;
use std::cmp::Ordering;

/// Whether an asset (as JSON) satisfies every filter and no exclusion
pub fn matches_request(request: &IndexSearchRequest, asset: &Value) -> bool {
    request.filters().iter().all(|c| matches_condition(asset, c))
        && !request.exclusions().iter().any(|c| matches_condition(asset, c))
}

/// Whether an asset (as JSON) satisfies one condition.
///
/// Multi-valued fields match when any element does; `!=` is the negation
/// of `==`.
pub fn matches_condition(asset: &Value, condition: &Condition) -> bool {
    if condition.operator == Operator::NotEqual {
        return !matches_condition(asset, &condition.positive());
    }

    field_values(asset, &condition.field)
        .iter()
        .any(|value| compare_values(value, condition.operator, &condition.value))
}

/// Order assets by the given sort keys. Missing values sort last.
pub fn sort_assets(assets: &mut [Value], sort: &[SortItem]) {
    if sort.is_empty() {
        return;
    }
    assets.sort_by(|a, b| {
        for item in sort {
            let ordering = compare_for_sort(
                field_values(a, &item.field).first(),
                field_values(b, &item.field).first(),
            );
            let ordering = match item.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn compare_for_sort(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::String(x)), Some(FieldValue::String(y))) => x.cmp(y),
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[derive(Debug, Clone)]
enum FieldValue {
    String(String),
    Number(f64),
    Bool(bool),
}

fn field_values(asset: &Value, field: &str) -> Vec<FieldValue> {
    // Handle internal fields
    match field {
        GUID_FIELD => return scalar(asset.get("guid")),
        TYPE_NAME_FIELD => return scalar(asset.get("typeName")),
        STATE_FIELD => {
            let state = asset.get("status").and_then(Value::as_str).unwrap_or("ACTIVE");
            return vec![FieldValue::String(state.to_string())];
        }
        TAG_NAMES_FIELD => {
            return asset
                .get("classifications")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(|t| t.get("typeName").and_then(Value::as_str))
                        .map(|name| FieldValue::String(name.to_string()))
                        .collect()
                })
                .unwrap_or_default();
        }
        _ => {}
    }

    // Attribute paths, possibly nested (e.g. "dashboard.uniqueAttributes.qualifiedName")
    let path: Vec<&str> = field.split('.').collect();
    let found = asset
        .get("attributes")
        .and_then(|attrs| extract_value(attrs, &path));
    match found {
        Some(Value::Array(items)) => items.iter().flat_map(|v| scalar(Some(v))).collect(),
        other => scalar(other),
    }
}

fn extract_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    match path.split_first() {
        None => Some(value),
        Some((head, rest)) => value.get(*head).and_then(|v| extract_value(v, rest)),
    }
}

fn scalar(value: Option<&Value>) -> Vec<FieldValue> {
    match value {
        Some(Value::String(s)) => vec![FieldValue::String(s.clone())],
        Some(Value::Number(n)) => n.as_f64().map(FieldValue::Number).into_iter().collect(),
        Some(Value::Bool(b)) => vec![FieldValue::Bool(*b)],
        _ => Vec::new(),
    }
}

fn compare_values(field: &FieldValue, op: Operator, query: &QueryValue) -> bool {
    match (field, query) {
        (FieldValue::String(f), QueryValue::String(q)) => match op {
            Operator::Equal => f == q,
            Operator::NotEqual => f != q,
            Operator::Contains => f.contains(q.as_str()),
            Operator::StartsWith => f.starts_with(q.as_str()),
            Operator::GreaterThan => f > q,
            Operator::LessThan => f < q,
            Operator::GreaterThanOrEqual => f >= q,
            Operator::LessThanOrEqual => f <= q,
        },
        (FieldValue::Number(f), QueryValue::Number(q)) => match op {
            Operator::Equal => (f - q).abs() < f64::EPSILON,
            Operator::NotEqual => (f - q).abs() >= f64::EPSILON,
            Operator::GreaterThan => f > q,
            Operator::LessThan => f < q,
            Operator::GreaterThanOrEqual => f >= q,
            Operator::LessThanOrEqual => f <= q,
            Operator::Contains | Operator::StartsWith => false,
        },
        (FieldValue::Bool(f), QueryValue::Boolean(q)) => match op {
            Operator::Equal => f == q,
            Operator::NotEqual => f != q,
            _ => false,
        },
        // Type mismatch
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluent::FluentSearch;
    use serde_json::json;

    fn tables() -> Vec<Value> {
        vec![
            json!({
                "typeName": "Table",
                "guid": "g-orders",
                "status": "ACTIVE",
                "classifications": [{"typeName": "PII"}],
                "attributes": {
                    "qualifiedName": "default/sf/1/DB/S/ORDERS",
                    "name": "ORDERS",
                    "rowCount": 1200,
                    "ownerUsers": ["ada", "grace"]
                }
            }),
            json!({
                "typeName": "Table",
                "guid": "g-items",
                "status": "DELETED",
                "attributes": {
                    "qualifiedName": "default/sf/1/DB/S/ITEMS",
                    "name": "ITEMS",
                    "rowCount": 40
                }
            }),
            json!({
                "typeName": "Dashboard",
                "guid": "g-dash",
                "attributes": {"qualifiedName": "default/pbi/2/sales", "name": "sales"}
            }),
        ]
    }

    fn matching(search: FluentSearch) -> Vec<String> {
        let request = search.to_request();
        tables()
            .iter()
            .filter(|t| matches_request(&request, t))
            .map(|t| t["guid"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_internal_fields() {
        let search = FluentSearch::new()
            .where_(Condition::type_name("Table"))
            .where_(Condition::active());
        assert_eq!(matching(search), vec!["g-orders"]);

        // Missing status counts as active
        let search = FluentSearch::new().where_(Condition::active());
        assert_eq!(matching(search), vec!["g-orders", "g-dash"]);
    }

    #[test]
    fn test_numeric_and_prefix() {
        let search = FluentSearch::new()
            .where_(Condition::new("rowCount", Operator::GreaterThan, 100u64));
        assert_eq!(matching(search), vec!["g-orders"]);

        let search = FluentSearch::new().where_(Condition::new(
            "qualifiedName",
            Operator::StartsWith,
            "default/sf/",
        ));
        assert_eq!(matching(search), vec!["g-orders", "g-items"]);
    }

    #[test]
    fn test_multi_valued_fields() {
        let search = FluentSearch::new().where_(Condition::eq("ownerUsers", "grace"));
        assert_eq!(matching(search), vec!["g-orders"]);

        let search = FluentSearch::new().where_(Condition::eq(TAG_NAMES_FIELD, "PII"));
        assert_eq!(matching(search), vec!["g-orders"]);
    }

    #[test]
    fn test_exclusions() {
        let search = FluentSearch::new().where_not(Condition::type_name("Table"));
        assert_eq!(matching(search), vec!["g-dash"]);
    }

    #[test]
    fn test_type_mismatch_never_matches() {
        let search = FluentSearch::new().where_(Condition::eq("rowCount", "1200"));
        assert!(matching(search).is_empty());
    }

    #[test]
    fn test_sort() {
        let mut assets = tables();
        sort_assets(&mut assets, &[SortItem::desc("name")]);
        let names: Vec<_> = assets.iter().map(|a| a["attributes"]["name"].clone()).collect();
        assert_eq!(names, vec![json!("sales"), json!("ORDERS"), json!("ITEMS")]);
    }
}
