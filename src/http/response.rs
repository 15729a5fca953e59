//! # Response Envelopes
//!
//! Single-document and counted-list response shapes. The paginated list
//! envelope lives with the list query builder.

use serde::Serialize;
use serde_json::Value;

/// Single-document response
#[derive(Debug, Clone, Serialize)]
pub struct DataBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Value,
}

impl DataBody {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Counted list response without pagination (scoped sub-resource lists,
/// radius search)
#[derive(Debug, Clone, Serialize)]
pub struct CountedBody {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Value>,
}

impl CountedBody {
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
