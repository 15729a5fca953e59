//! # Filter Conditions
//!
//! Structured filter mapping accepted by `CollectionStore::find`.
//! Equality conditions match exact field values; comparison conditions use
//! the closed operator set recognized by the list parser.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals
    #[serde(rename = "eq")]
    Eq,

    /// Greater than
    #[serde(rename = "gt")]
    Gt,

    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,

    /// Less than
    #[serde(rename = "lt")]
    Lt,

    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,

    /// Value in list
    #[serde(rename = "in")]
    In,
}

impl FilterOperator {
    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
        }
    }

    /// Map an operator token to its enum form.
    ///
    /// Only the exact tokens `gt`, `gte`, `lt`, `lte`, `in` are recognized;
    /// anything else (including longer words containing these as substrings)
    /// returns None and is left untouched by callers.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            _ => None,
        }
    }
}

/// A single filter condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality condition
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Check if a document matches this condition
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = match doc.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match self.operator {
            FilterOperator::Eq => field_value == &self.value,
            FilterOperator::Gt => compare_json_values(field_value, &self.value).is_gt(),
            FilterOperator::Gte => compare_json_values(field_value, &self.value).is_ge(),
            FilterOperator::Lt => compare_json_values(field_value, &self.value).is_lt(),
            FilterOperator::Lte => compare_json_values(field_value, &self.value).is_le(),
            FilterOperator::In => {
                let candidates = match &self.value {
                    Value::Array(values) => values.as_slice(),
                    single => std::slice::from_ref(single),
                };
                // Array-valued fields match on any shared element
                match field_value {
                    Value::Array(elements) => {
                        elements.iter().any(|e| candidates.contains(e))
                    }
                    single => candidates.contains(single),
                }
            }
        }
    }
}

/// An immutable set of conditions combined with AND logic.
///
/// Built once per request from the inbound parameter map and never mutated
/// afterwards, so no request-scoped state can leak between operations.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    conditions: Vec<FilterCondition>,
}

impl FilterSpec {
    /// The spec matching every document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a spec from a list of conditions
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }

    /// Convenience constructor for a single equality condition
    pub fn field_eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(vec![FilterCondition::eq(field, value)])
    }

    /// Add a condition, consuming self
    pub fn and(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// True when the spec has no conditions (matches everything)
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The conditions in application order
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Check if a document matches all conditions
    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

/// Compare two JSON values for ordering.
///
/// Numbers compare by f64, strings lexicographically; mismatched or
/// non-comparable types compare equal.
pub fn compare_json_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a_f = a.as_f64().unwrap_or(0.0);
            let b_f = b.as_f64().unwrap_or(0.0);
            a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
