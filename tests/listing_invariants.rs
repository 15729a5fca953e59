//! List Query Builder Invariant Tests
//!
//! End-to-end checks of the list machinery against an in-memory store:
//! - reserved keys never become filters
//! - bracket operators map onto the comparison set, whole tokens only
//! - pagination links follow the filtered total
//! - sort, projection and populate behave as documented
//! - identical inputs yield identical envelopes

use std::collections::HashMap;

use campdir::listing::{self, Page, Pagination};
use campdir::store::{CollectionStore, MemoryStore, Populate};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A store with `n` bootcamps at ascending creation times and costs
fn seeded_store(n: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..n {
        store
            .insert(
                "bootcamps",
                json!({
                    "name": format!("camp-{:02}", i),
                    "average_cost": 1000 * (i as i64 + 1),
                    "housing": i % 2 == 0,
                    "created_at": format!("2024-03-{:02}T00:00:00Z", i + 1),
                }),
            )
            .unwrap();
    }
    store
}

// =============================================================================
// Filter Interpretation
// =============================================================================

/// Parameters that are all reserved keys produce a full, unfiltered query.
#[test]
fn test_reserved_only_parameters_match_everything() {
    let store = seeded_store(7);

    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("select", "name"), ("sort", "name"), ("limit", "100"), ("page", "1")]),
    )
    .unwrap();

    assert_eq!(envelope.count, 7);
}

/// `field[op]=value` keys use the comparison operator on the field.
#[test]
fn test_bracket_operators_filter_by_comparison() {
    let store = seeded_store(10);

    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("average_cost[lte]", "3000"), ("limit", "100")]),
    )
    .unwrap();

    assert_eq!(envelope.count, 3);
    for doc in &envelope.data {
        assert!(doc["average_cost"].as_i64().unwrap() <= 3000);
    }
}

/// An `in` filter matches set membership over comma-split values.
#[test]
fn test_in_operator_matches_any_listed_value() {
    let store = MemoryStore::new();
    for career in ["Business", "Web Development", "Data Science"] {
        store
            .insert("bootcamps", json!({"primary_career": career}))
            .unwrap();
    }

    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("primary_career[in]", "Business,Data Science")]),
    )
    .unwrap();

    assert_eq!(envelope.count, 2);
}

/// A field literally named `integer` (containing `in`, `gt`, ...) is never
/// rewritten; it stays a plain equality filter.
#[test]
fn test_operator_like_substrings_are_not_corrupted() {
    let store = MemoryStore::new();
    store.insert("docs", json!({"integer": 5, "tag": "mint"})).unwrap();
    store.insert("docs", json!({"integer": 9, "tag": "flint"})).unwrap();

    let envelope = listing::run(&store, "docs", None, &params(&[("integer", "5")])).unwrap();
    assert_eq!(envelope.count, 1);
    assert_eq!(envelope.data[0]["integer"], 5);

    let envelope = listing::run(&store, "docs", None, &params(&[("tag", "mint")])).unwrap();
    assert_eq!(envelope.count, 1);
}

// =============================================================================
// Pagination
// =============================================================================

/// total=25, limit=10, page=1: next only.
#[test]
fn test_pagination_first_page() {
    let store = seeded_store(25);
    let envelope = listing::run(&store, "bootcamps", None, &HashMap::new()).unwrap();

    assert_eq!(envelope.count, 10);
    assert_eq!(
        envelope.pagination,
        Pagination {
            next: Some(Page { page: 2, limit: 10 }),
            prev: None,
        }
    );
}

/// total=25, limit=10, page=3: prev only (end index 30 >= total 25).
#[test]
fn test_pagination_last_page() {
    let store = seeded_store(25);
    let envelope =
        listing::run(&store, "bootcamps", None, &params(&[("page", "3")])).unwrap();

    assert_eq!(envelope.count, 5);
    assert_eq!(
        envelope.pagination,
        Pagination {
            next: None,
            prev: Some(Page { page: 2, limit: 10 }),
        }
    );
}

/// total=5, limit=10, page=1: neither link.
#[test]
fn test_pagination_single_page() {
    let store = seeded_store(5);
    let envelope = listing::run(&store, "bootcamps", None, &HashMap::new()).unwrap();

    assert_eq!(envelope.count, 5);
    assert_eq!(envelope.pagination, Pagination::default());
}

/// Pagination totals follow the filtered subset, not the whole collection.
#[test]
fn test_pagination_total_is_filtered() {
    let store = seeded_store(25);

    // 5 documents match; a single page must carry no links even though the
    // collection itself holds 25
    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("average_cost[lte]", "5000")]),
    )
    .unwrap();

    assert_eq!(envelope.count, 5);
    assert_eq!(envelope.pagination, Pagination::default());
}

/// Non-numeric page and limit fall back to 1 and 10.
#[test]
fn test_invalid_pagination_parameters_recover() {
    let store = seeded_store(25);
    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("page", "first"), ("limit", "lots")]),
    )
    .unwrap();

    assert_eq!(envelope.count, 10);
    assert_eq!(envelope.pagination.next, Some(Page { page: 2, limit: 10 }));
}

// =============================================================================
// Sort & Projection
// =============================================================================

/// Without a sort parameter the newest documents come first.
#[test]
fn test_default_sort_newest_first() {
    let store = seeded_store(4);
    let envelope = listing::run(&store, "bootcamps", None, &HashMap::new()).unwrap();

    let names: Vec<_> = envelope
        .data
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["camp-03", "camp-02", "camp-01", "camp-00"]);
}

/// `sort=name,-age` sorts ascending by name, then descending by age.
#[test]
fn test_multi_key_sort() {
    let store = MemoryStore::new();
    for (name, age) in [("bob", 25), ("amy", 20), ("amy", 30)] {
        store.insert("people", json!({"name": name, "age": age})).unwrap();
    }

    let envelope =
        listing::run(&store, "people", None, &params(&[("sort", "name,-age")])).unwrap();

    let rows: Vec<_> = envelope
        .data
        .iter()
        .map(|d| (d["name"].as_str().unwrap(), d["age"].as_i64().unwrap()))
        .collect();
    assert_eq!(rows, vec![("amy", 30), ("amy", 20), ("bob", 25)]);
}

/// `select=name,description` projects exactly those fields plus the id.
#[test]
fn test_projection_keeps_selected_fields_and_id() {
    let store = MemoryStore::new();
    store
        .insert(
            "bootcamps",
            json!({"name": "Devworks", "description": "Full stack", "housing": true}),
        )
        .unwrap();

    let envelope = listing::run(
        &store,
        "bootcamps",
        None,
        &params(&[("select", "name,description")]),
    )
    .unwrap();

    let obj = envelope.data[0].as_object().unwrap();
    let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["description", "id", "name"]);
}

// =============================================================================
// Idempotence & Populate
// =============================================================================

/// Two runs with identical inputs against an unmodified collection yield
/// identical envelopes.
#[test]
fn test_idempotence() {
    let store = seeded_store(25);
    let raw = params(&[
        ("average_cost[gte]", "4000"),
        ("sort", "-average_cost"),
        ("page", "2"),
        ("limit", "7"),
    ]);

    let first = listing::run(&store, "bootcamps", None, &raw).unwrap();
    let second = listing::run(&store, "bootcamps", None, &raw).unwrap();

    assert_eq!(first.count, second.count);
    assert_eq!(first.pagination, second.pagination);
    assert_eq!(first.data, second.data);
}

/// With populate supplied, every returned document embeds the relation.
#[test]
fn test_populate_embeds_children() {
    let store = seeded_store(3);
    let camps = store
        .execute(&store.find("bootcamps", Default::default()))
        .unwrap();

    for camp in &camps {
        let camp_id = camp["id"].as_str().unwrap();
        store
            .insert("courses", json!({"title": "Course", "bootcamp": camp_id}))
            .unwrap();
    }

    let envelope = listing::run(
        &store,
        "bootcamps",
        Some(Populate::children("courses", "courses", "bootcamp")),
        &HashMap::new(),
    )
    .unwrap();

    for doc in &envelope.data {
        let courses = doc["courses"].as_array().unwrap();
        assert_eq!(courses.len(), 1);
        assert!(courses[0].is_object());
    }
}

/// Reference populate replaces the stored id with the projected document.
#[test]
fn test_populate_resolves_references() {
    let store = seeded_store(1);
    let camp = &store
        .execute(&store.find("bootcamps", Default::default()))
        .unwrap()[0];
    let camp_id = camp["id"].as_str().unwrap();

    store
        .insert("courses", json!({"title": "Course", "bootcamp": camp_id}))
        .unwrap();

    let envelope = listing::run(
        &store,
        "courses",
        Some(Populate::reference_with_select(
            "bootcamp",
            "bootcamps",
            vec!["name".to_string()],
        )),
        &HashMap::new(),
    )
    .unwrap();

    let embedded = &envelope.data[0]["bootcamp"];
    assert!(embedded.is_object());
    assert_eq!(embedded["name"], "camp-00");
}

// =============================================================================
// Envelope Shape
// =============================================================================

/// The serialized envelope carries success/count/pagination/data, and the
/// pagination object omits absent links.
#[test]
fn test_envelope_serialization_shape() {
    let store = seeded_store(5);
    let envelope = listing::run(&store, "bootcamps", None, &HashMap::new()).unwrap();

    let body = serde_json::to_value(&envelope).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 5);
    assert_eq!(body["pagination"], json!({}));
    assert!(body["data"].is_array());
}
