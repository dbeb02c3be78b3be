//! Index-search request and response shapes

use crate::query::{Condition, SortItem};
use serde::{Deserialize, Serialize};
use tessera_core::Result;
use tessera_model::Asset;

/// Conditions combined under a `bool` query.
///
/// `filter` clauses must all match; `must_not` clauses must all fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Condition>,
}

/// `bool` wrapper required by the DSL
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryClause {
    #[serde(rename = "bool")]
    pub bool_query: BoolQuery,
}

/// The `dsl` section of an index search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dsl {
    pub from: usize,
    pub size: usize,
    pub query: QueryClause,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortItem>,
}

/// Body of `POST /api/meta/search/indexsearch`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSearchRequest {
    pub dsl: Dsl,
    /// Attributes to include on each result
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// Attributes to include on each related asset of a result
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relation_attributes: Vec<String>,
    pub suppress_logs: bool,
}

impl IndexSearchRequest {
    pub fn filters(&self) -> &[Condition] {
        &self.dsl.query.bool_query.filter
    }

    pub fn exclusions(&self) -> &[Condition] {
        &self.dsl.query.bool_query.must_not
    }

    /// The same request, starting at `from`
    pub fn at_offset(&self, from: usize) -> Self {
        let mut next = self.clone();
        next.dsl.from = from;
        next
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Total number of matches across all pages, as estimated by the server
    #[serde(default)]
    pub approximate_count: u64,
    #[serde(default)]
    pub entities: Vec<Asset>,
}

/// Anything that can answer an index search.
///
/// Implemented by every catalog client; the fluent builder streams pages
/// through it.
pub trait SearchSource {
    fn search(&self, request: &IndexSearchRequest) -> Result<SearchPage>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_decodes_mixed_types() {
        let page: SearchPage = serde_json::from_value(json!({
            "approximateCount": 2,
            "entities": [
                {"typeName": "Table", "guid": "a", "attributes": {"qualifiedName": "c/d/s/t"}},
                {"typeName": "Unheard", "guid": "b", "attributes": {"qualifiedName": "x"}}
            ]
        }))
        .unwrap();
        assert_eq!(page.approximate_count, 2);
        assert!(matches!(page.entities[0], Asset::Table(_)));
        assert!(matches!(page.entities[1], Asset::Generic(_)));
    }

    #[test]
    fn test_empty_page() {
        let page: SearchPage = serde_json::from_value(json!({"approximateCount": 0})).unwrap();
        assert!(page.entities.is_empty());
    }
}
