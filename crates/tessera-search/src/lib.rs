//! Tessera Search - Finding assets
//!
//! Searches are built with [`FluentSearch`], sent as an
//! [`IndexSearchRequest`] to any [`SearchSource`], and streamed back page
//! by page. The textual syntax used by the CLI
//! (`assets where name contains 'ord'`) parses into the same builder.

mod evaluate;
mod fluent;
mod output;
mod parser;
mod query;
mod request;

pub use evaluate::{matches_condition, matches_request, sort_assets};
pub use fluent::{FluentSearch, SearchStream, DEFAULT_PAGE_SIZE};
pub use output::{format_assets, format_json, format_toml, OutputFormat};
pub use parser::{parse_query, parse_search, QueryError, TextQuery};
pub use query::{
    Condition, Operator, QueryValue, SortItem, SortOrder, GUID_FIELD, STATE_FIELD,
    TAG_NAMES_FIELD, TYPE_NAME_FIELD,
};
pub use request::{BoolQuery, Dsl, IndexSearchRequest, QueryClause, SearchPage, SearchSource};
