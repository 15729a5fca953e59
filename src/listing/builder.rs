//! # List Query Builder
//!
//! Shared by every list endpoint: turns an inbound parameter map plus a
//! collection name into a paginated, sorted, field-selected, optionally
//! populated result envelope.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::store::{CollectionStore, Populate, StoreResult};

use super::params::ListParams;

/// A pagination cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

/// Links to the adjacent pages, when they exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Page>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Page>,
}

/// The list result envelope returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

/// Run a list query and build its envelope.
///
/// Steps, in order: parse the parameter map (reserved keys `select`, `sort`,
/// `limit`, `page` stripped, the rest interpreted as filters), count the
/// documents matching the filter, execute the configured query once, and
/// derive the pagination links.
///
/// The total used for pagination is the *filtered* count, so `next` never
/// points past the last page of actual results even when filters are
/// applied.
///
/// Store failures propagate unchanged; no partial envelope is ever produced.
/// Invalid pagination input recovers to the defaults during parsing and is
/// never an error.
pub fn run<S>(
    store: &S,
    collection: &str,
    populate: Option<Populate>,
    raw_params: &HashMap<String, String>,
) -> StoreResult<ListEnvelope>
where
    S: CollectionStore + ?Sized,
{
    let ListParams {
        filter,
        select,
        sort,
        page,
        limit,
    } = ListParams::parse(raw_params);

    let start_index = (page - 1) * limit;
    let end_index = page * limit;

    let total = store.count(collection, &filter)?;

    let mut query = store
        .find(collection, filter)
        .sort(sort)
        .skip(start_index)
        .limit(limit);
    if let Some(fields) = select {
        query = query.select(fields);
    }
    if let Some(populate) = populate {
        query = query.populate(populate);
    }

    let data = store.execute(&query)?;

    let mut pagination = Pagination::default();
    if end_index < total {
        pagination.next = Some(Page {
            page: page + 1,
            limit,
        });
    }
    if start_index > 0 {
        pagination.prev = Some(Page {
            page: page - 1,
            limit,
        });
    }

    Ok(ListEnvelope {
        success: true,
        count: data.len(),
        pagination,
        data,
    })
}
