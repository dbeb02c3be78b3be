//! Search conditions and their index-search DSL form

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Internal field holding an asset's GUID
pub const GUID_FIELD: &str = "__guid";
/// Internal field holding an asset's `typeName`
pub const TYPE_NAME_FIELD: &str = "__typeName";
/// Internal field holding an asset's lifecycle status
pub const STATE_FIELD: &str = "__state";
/// Internal field holding the names of the tags directly assigned
pub const TAG_NAMES_FIELD: &str = "__traitNames";

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Contains,
    StartsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Operator {
    fn range_key(&self) -> Option<&'static str> {
        match self {
            Operator::GreaterThan => Some("gt"),
            Operator::LessThan => Some("lt"),
            Operator::GreaterThanOrEqual => Some("gte"),
            Operator::LessThanOrEqual => Some("lte"),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
        };
        f.write_str(s)
    }
}

/// Query values
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            QueryValue::String(s) => json!(s),
            QueryValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                json!(*n as i64)
            }
            QueryValue::Number(n) => json!(n),
            QueryValue::Boolean(b) => json!(b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Number(n)
    }
}

impl From<u64> for QueryValue {
    fn from(n: u64) -> Self {
        QueryValue::Number(n as f64)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Boolean(b)
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: QueryValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<QueryValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::new(field, Operator::Equal, value)
    }

    pub fn type_name(type_name: &str) -> Self {
        Self::eq(TYPE_NAME_FIELD, type_name)
    }

    pub fn guid(guid: &str) -> Self {
        Self::eq(GUID_FIELD, guid)
    }

    pub fn active() -> Self {
        Self::eq(STATE_FIELD, "ACTIVE")
    }

    pub fn qualified_name(qualified_name: &str) -> Self {
        Self::eq("qualifiedName", qualified_name)
    }

    /// `!=` is expressed as a negated equality on the wire
    pub fn is_negated(&self) -> bool {
        self.operator == Operator::NotEqual
    }

    /// The positive form of this condition, for use under `must_not`
    pub fn positive(&self) -> Condition {
        if self.is_negated() {
            Condition::new(self.field.clone(), Operator::Equal, self.value.clone())
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value.to_json())
    }
}

/// Serializes to the index-search clause (`term`, `wildcard`, `prefix`,
/// `range`). A `!=` condition serializes to its positive `term`; the
/// caller is responsible for placing it under `must_not`.
impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value.to_json();
        let (kind, body) = match self.operator {
            Operator::Equal | Operator::NotEqual => ("term", json!({ &self.field: value })),
            Operator::Contains => {
                let pattern = format!("*{}*", self.value.as_str().unwrap_or_default());
                ("wildcard", json!({ &self.field: pattern }))
            }
            Operator::StartsWith => ("prefix", json!({ &self.field: value })),
            op => {
                let key = op.range_key().unwrap_or("gte");
                ("range", json!({ &self.field: { key: value } }))
            }
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(kind, &body)?;
        map.end()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub field: String,
    pub order: SortOrder,
}

impl SortItem {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

impl Serialize for SortItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &json!({ "order": self.order }))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_clause() {
        let value = serde_json::to_value(Condition::type_name("Table")).unwrap();
        assert_eq!(value, json!({"term": {"__typeName": "Table"}}));
    }

    #[test]
    fn test_range_clause_uses_integer_when_whole() {
        let cond = Condition::new("rowCount", Operator::GreaterThanOrEqual, 10u64);
        let value = serde_json::to_value(cond).unwrap();
        assert_eq!(value, json!({"range": {"rowCount": {"gte": 10}}}));
    }

    #[test]
    fn test_text_clauses() {
        let contains = Condition::new("name", Operator::Contains, "ord");
        let prefix = Condition::new("qualifiedName", Operator::StartsWith, "default/sf");
        assert_eq!(
            serde_json::to_value(contains).unwrap(),
            json!({"wildcard": {"name": "*ord*"}})
        );
        assert_eq!(
            serde_json::to_value(prefix).unwrap(),
            json!({"prefix": {"qualifiedName": "default/sf"}})
        );
    }

    #[test]
    fn test_not_equal_positive_form() {
        let cond = Condition::new("__state", Operator::NotEqual, "DELETED");
        assert!(cond.is_negated());
        assert_eq!(cond.positive().operator, Operator::Equal);
    }

    #[test]
    fn test_sort_item() {
        let value = serde_json::to_value(SortItem::desc("name")).unwrap();
        assert_eq!(value, json!({"name": {"order": "desc"}}));
    }
}
