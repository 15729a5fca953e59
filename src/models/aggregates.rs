//! # Derived Aggregates
//!
//! A bootcamp's `average_cost` and `average_rating` are derived from its
//! courses and reviews. They are recomputed after every mutation of the
//! related collection, mirroring how the fields are kept current in the
//! underlying data model.

use serde_json::{json, Value};

use crate::store::{CollectionStore, FilterSpec, StoreResult};

use super::{course, review};

/// Recompute a bootcamp's average course tuition.
///
/// The mean is rounded to whole currency units; with no courses left the
/// field is cleared.
pub fn recompute_average_cost<S>(store: &S, bootcamp_id: &str) -> StoreResult<()>
where
    S: CollectionStore + ?Sized,
{
    let filter = FilterSpec::field_eq(course::BOOTCAMP_FIELD, json!(bootcamp_id));
    let courses = store.execute(&store.find(course::COLLECTION, filter))?;

    let value = mean(&courses, "tuition").map(|avg| json!(avg.round() as i64));
    write_field(store, bootcamp_id, "average_cost", value)
}

/// Recompute a bootcamp's average review rating, kept to one decimal.
pub fn recompute_average_rating<S>(store: &S, bootcamp_id: &str) -> StoreResult<()>
where
    S: CollectionStore + ?Sized,
{
    let filter = FilterSpec::field_eq(review::BOOTCAMP_FIELD, json!(bootcamp_id));
    let reviews = store.execute(&store.find(review::COLLECTION, filter))?;

    let value = mean(&reviews, "rating").map(|avg| json!((avg * 10.0).round() / 10.0));
    write_field(store, bootcamp_id, "average_rating", value)
}

fn mean(docs: &[Value], field: &str) -> Option<f64> {
    let values: Vec<f64> = docs
        .iter()
        .filter_map(|d| d.get(field).and_then(Value::as_f64))
        .collect();

    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn write_field<S>(
    store: &S,
    bootcamp_id: &str,
    field: &str,
    value: Option<Value>,
) -> StoreResult<()>
where
    S: CollectionStore + ?Sized,
{
    let changes = json!({ field: value.unwrap_or(Value::Null) });
    store.update(super::bootcamp::COLLECTION, bootcamp_id, &changes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with_bootcamp() -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let camp = store
            .insert("bootcamps", json!({"name": "Devworks"}))
            .unwrap();
        let id = camp["id"].as_str().unwrap().to_string();
        (store, id)
    }

    #[test]
    fn test_average_cost_is_rounded_mean() {
        let (store, id) = store_with_bootcamp();
        store
            .insert("courses", json!({"bootcamp": id, "tuition": 8000}))
            .unwrap();
        store
            .insert("courses", json!({"bootcamp": id, "tuition": 11000}))
            .unwrap();

        recompute_average_cost(&store, &id).unwrap();

        let camp = store.get("bootcamps", &id).unwrap().unwrap();
        assert_eq!(camp["average_cost"], 9500);
    }

    #[test]
    fn test_average_rating_keeps_one_decimal() {
        let (store, id) = store_with_bootcamp();
        for rating in [8, 9, 9] {
            store
                .insert("reviews", json!({"bootcamp": id, "rating": rating}))
                .unwrap();
        }

        recompute_average_rating(&store, &id).unwrap();

        let camp = store.get("bootcamps", &id).unwrap().unwrap();
        assert_eq!(camp["average_rating"], 8.7);
    }

    #[test]
    fn test_cleared_when_no_related_documents() {
        let (store, id) = store_with_bootcamp();
        store
            .insert("courses", json!({"bootcamp": id, "tuition": 8000}))
            .unwrap();
        recompute_average_cost(&store, &id).unwrap();

        store.clear("courses").unwrap();
        recompute_average_cost(&store, &id).unwrap();

        let camp = store.get("bootcamps", &id).unwrap().unwrap();
        assert!(camp["average_cost"].is_null());
    }
}
