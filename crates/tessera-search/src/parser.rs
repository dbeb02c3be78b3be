//! Textual search syntax parser

use crate::fluent::FluentSearch;
use crate::query::{Condition, Operator, QueryValue};
use pest::Parser;
use pest_derive::Parser;
use tessera_core::TesseraError;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct QueryParser;

/// The only resource the textual syntax searches
pub const ASSETS_RESOURCE: &str = "assets";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Unknown resource '{0}' (expected 'assets')")]
    UnknownResource(String),
}

impl From<QueryError> for TesseraError {
    fn from(err: QueryError) -> Self {
        TesseraError::InvalidQuery(err.to_string())
    }
}

/// A parsed textual query
#[derive(Debug, Clone)]
pub struct TextQuery {
    pub resource: String,
    pub conditions: Vec<Condition>,
}

impl TextQuery {
    /// Translate into a search; every condition must hold
    pub fn into_search(self) -> Result<FluentSearch, QueryError> {
        if self.resource != ASSETS_RESOURCE {
            return Err(QueryError::UnknownResource(self.resource));
        }
        Ok(self
            .conditions
            .into_iter()
            .fold(FluentSearch::new(), FluentSearch::where_))
    }
}

/// Parse a query string
pub fn parse_query(input: &str) -> Result<TextQuery, QueryError> {
    let pairs = QueryParser::parse(Rule::query, input)
        .map_err(|e| QueryError::ParseError(e.to_string()))?;

    let mut resource = String::new();
    let mut conditions = Vec::new();

    for pair in pairs {
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::resource => {
                    resource = inner.as_str().to_string();
                }
                Rule::where_clause => {
                    for clause_inner in inner.into_inner() {
                        if clause_inner.as_rule() == Rule::condition {
                            conditions.push(parse_condition(clause_inner)?);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(TextQuery {
        resource,
        conditions,
    })
}

/// Parse a query string straight into a search
pub fn parse_search(input: &str) -> Result<FluentSearch, QueryError> {
    parse_query(input)?.into_search()
}

fn parse_condition(pair: pest::iterators::Pair<Rule>) -> Result<Condition, QueryError> {
    let mut field = String::new();
    let mut operator = Operator::Equal;
    let mut value = QueryValue::String(String::new());

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::field => {
                field = inner.as_str().to_string();
            }
            Rule::operator => {
                operator = parse_operator(inner.as_str())?;
            }
            Rule::value => {
                value = parse_value(inner)?;
            }
            _ => {}
        }
    }

    Ok(Condition {
        field,
        operator,
        value,
    })
}

fn parse_operator(op: &str) -> Result<Operator, QueryError> {
    match op.to_ascii_lowercase().as_str() {
        "==" => Ok(Operator::Equal),
        "!=" => Ok(Operator::NotEqual),
        "contains" => Ok(Operator::Contains),
        "startswith" => Ok(Operator::StartsWith),
        ">" => Ok(Operator::GreaterThan),
        "<" => Ok(Operator::LessThan),
        ">=" => Ok(Operator::GreaterThanOrEqual),
        "<=" => Ok(Operator::LessThanOrEqual),
        _ => Err(QueryError::InvalidOperator(op.to_string())),
    }
}

fn parse_value(pair: pest::iterators::Pair<Rule>) -> Result<QueryValue, QueryError> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::string => {
                // Extract the inner string content
                for string_inner in inner.into_inner() {
                    match string_inner.as_rule() {
                        Rule::string_inner | Rule::string_inner_dq => {
                            return Ok(QueryValue::String(string_inner.as_str().to_string()));
                        }
                        _ => {}
                    }
                }
            }
            Rule::number => {
                let n: f64 = inner
                    .as_str()
                    .parse()
                    .map_err(|_| QueryError::InvalidValue(inner.as_str().to_string()))?;
                return Ok(QueryValue::Number(n));
            }
            Rule::boolean => {
                let b = inner.as_str() == "true";
                return Ok(QueryValue::Boolean(b));
            }
            _ => {}
        }
    }

    Err(QueryError::InvalidValue("empty value".to_string()))
}
