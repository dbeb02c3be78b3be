//! Fluent search builder and lazy result paging

use crate::query::{Condition, SortItem};
use crate::request::{BoolQuery, Dsl, IndexSearchRequest, QueryClause, SearchSource};
use std::collections::VecDeque;
use tessera_core::Result;
use tessera_model::Asset;
use tracing::debug;

/// Results per page unless [`FluentSearch::page_size`] says otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Builder for an index search.
///
/// ```ignore
/// let tables = FluentSearch::new()
///     .where_(Condition::type_name("Table"))
///     .where_(Condition::active())
///     .includes_on_results(["description"])
///     .page_size(50)
///     .stream(&client);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FluentSearch {
    filters: Vec<Condition>,
    exclusions: Vec<Condition>,
    attributes: Vec<String>,
    relation_attributes: Vec<String>,
    sort: Vec<SortItem>,
    page_size: usize,
    limit: Option<usize>,
}

impl Default for FluentSearch {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            exclusions: Vec::new(),
            attributes: Vec::new(),
            relation_attributes: Vec::new(),
            sort: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            limit: None,
        }
    }
}

impl FluentSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a condition to match. `!=` conditions are moved to the
    /// exclusions in their positive form.
    pub fn where_(mut self, condition: Condition) -> Self {
        if condition.is_negated() {
            self.exclusions.push(condition.positive());
        } else {
            self.filters.push(condition);
        }
        self
    }

    /// Require a condition not to match
    pub fn where_not(mut self, condition: Condition) -> Self {
        self.exclusions.push(condition.positive());
        self
    }

    /// Attributes to include on each result
    pub fn includes_on_results<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Attributes to include on assets related to each result
    pub fn includes_on_relations<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_attributes
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn sort(mut self, item: SortItem) -> Self {
        self.sort.push(item);
        self
    }

    /// Stop streaming after this many results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Condition] {
        &self.filters
    }

    pub fn exclusions(&self) -> &[Condition] {
        &self.exclusions
    }

    /// Remove every condition on `field`
    pub fn without_field(mut self, field: &str) -> Self {
        self.filters.retain(|c| c.field != field);
        self.exclusions.retain(|c| c.field != field);
        self
    }

    /// The request for the first page
    pub fn to_request(&self) -> IndexSearchRequest {
        IndexSearchRequest {
            dsl: Dsl {
                from: 0,
                size: self.page_size,
                query: QueryClause {
                    bool_query: BoolQuery {
                        filter: self.filters.clone(),
                        must_not: self.exclusions.clone(),
                    },
                },
                sort: self.sort.clone(),
            },
            attributes: self.attributes.clone(),
            relation_attributes: self.relation_attributes.clone(),
            suppress_logs: true,
        }
    }

    /// Lazily page through every result
    pub fn stream<'a, S: SearchSource + ?Sized>(&self, source: &'a S) -> SearchStream<'a, S> {
        SearchStream {
            source,
            request: self.to_request(),
            buffer: VecDeque::new(),
            next_offset: 0,
            yielded: 0,
            limit: self.limit,
            exhausted: false,
        }
    }

    /// Fetch only the first page and return its first result
    pub fn first<S: SearchSource + ?Sized>(&self, source: &S) -> Result<Option<Asset>> {
        self.stream(source).next().transpose()
    }

    /// Collect every result
    pub fn collect_all<S: SearchSource + ?Sized>(&self, source: &S) -> Result<Vec<Asset>> {
        self.stream(source).collect()
    }
}

/// Iterator over search results, fetching a page whenever the buffer runs
/// dry. A failed page fetch is yielded once and ends the stream.
pub struct SearchStream<'a, S: SearchSource + ?Sized> {
    source: &'a S,
    request: IndexSearchRequest,
    buffer: VecDeque<Asset>,
    next_offset: usize,
    yielded: usize,
    limit: Option<usize>,
    exhausted: bool,
}

impl<S: SearchSource + ?Sized> SearchStream<'_, S> {
    fn fetch_page(&mut self) -> Result<()> {
        let request = self.request.at_offset(self.next_offset);
        debug!(from = request.dsl.from, size = request.dsl.size, "fetching search page");
        let page = self.source.search(&request)?;

        let received = page.entities.len();
        self.next_offset += received;
        // A zero count means the server did not report one
        let past_count =
            page.approximate_count > 0 && self.next_offset as u64 >= page.approximate_count;
        if received < request.dsl.size || past_count {
            self.exhausted = true;
        }
        self.buffer.extend(page.entities);
        Ok(())
    }
}

impl<S: SearchSource + ?Sized> Iterator for SearchStream<'_, S> {
    type Item = Result<Asset>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(err) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
        let asset = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(Ok(asset))
    }
}
