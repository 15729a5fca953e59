//! # List Parameter Parser
//!
//! Turns a flat query-string map into an immutable filter spec plus the
//! control values (projection, sort, pagination). The caller's map is never
//! mutated; reserved control keys are stripped before the remainder is
//! interpreted as filters.

use std::collections::HashMap;

use serde_json::Value;

use crate::store::{FilterCondition, FilterOperator, FilterSpec, SortKey};

/// Control keys excluded from filter interpretation
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "limit", "page"];

/// Default page when absent or invalid
pub const DEFAULT_PAGE: usize = 1;

/// Default page size when absent or invalid
pub const DEFAULT_LIMIT: usize = 10;

/// Field used for the default sort (newest first)
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Parsed list parameters
#[derive(Debug, Clone)]
pub struct ListParams {
    /// Reserved-key-stripped filter conditions
    pub filter: FilterSpec,

    /// Fields to project (None = all)
    pub select: Option<Vec<String>>,

    /// Sort keys, in order
    pub sort: Vec<SortKey>,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,
}

impl ListParams {
    /// Parse an inbound parameter map.
    ///
    /// Parsing never fails: malformed `page`/`limit` values recover to the
    /// defaults, and keys that do not carry a recognized bracket operator are
    /// kept verbatim as equality filters.
    pub fn parse(params: &HashMap<String, String>) -> Self {
        let mut conditions = Vec::new();

        for (key, value) in params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            conditions.push(parse_condition(key, value));
        }

        // HashMap iteration order is arbitrary; keep condition order deterministic
        conditions.sort_by(|a, b| a.field.cmp(&b.field));

        let select = params.get("select").map(|s| split_list(s));

        let sort = match params.get("sort") {
            Some(spec) => spec
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SortKey::parse)
                .collect(),
            None => vec![SortKey::desc(DEFAULT_SORT_FIELD)],
        };

        let page = parse_positive(params.get("page")).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(params.get("limit")).unwrap_or(DEFAULT_LIMIT);

        Self {
            filter: FilterSpec::new(conditions),
            select,
            sort,
            page,
            limit,
        }
    }
}

/// Parse one key/value pair into a filter condition.
///
/// A key of the exact form `field[op]` with `op` one of `gt|gte|lt|lte|in`
/// becomes a comparison; any other key — including keys merely containing
/// those substrings, like a field named `integer` — is an equality filter on
/// the untouched key.
fn parse_condition(key: &str, value: &str) -> FilterCondition {
    if let Some((field, token)) = split_bracket_key(key) {
        if let Some(operator) = FilterOperator::from_token(token) {
            let parsed = if operator == FilterOperator::In {
                Value::Array(split_list(value).into_iter().map(coerce_scalar).collect())
            } else {
                coerce_scalar(value.to_string())
            };
            return FilterCondition::new(field, operator, parsed);
        }
    }

    FilterCondition::eq(key, coerce_scalar(value.to_string()))
}

/// Split `field[token]` into its parts; None when the key has no brackets
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_suffix(']')?;
    let open = rest.find('[')?;
    let field = &rest[..open];
    let token = &rest[open + 1..];
    if field.is_empty() || token.is_empty() {
        return None;
    }
    Some((field, token))
}

/// Comma-split a list value, trimming entries
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Coerce a raw query-string value into a JSON scalar
fn coerce_scalar(value: String) -> Value {
    if value == "null" {
        return Value::Null;
    }
    if value == "true" {
        return Value::Bool(true);
    }
    if value == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }
    Value::String(value)
}

/// Parse a positive integer; anything else is None
fn parse_positive(raw: Option<&String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
}
