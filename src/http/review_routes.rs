//! # Review Routes
//!
//! Flat `/api/v1/reviews` endpoints plus the bootcamp-scoped handlers
//! mounted from the bootcamp router. One review per user per bootcamp.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::auth::{authorize, require_owner, Role};
use crate::listing::{self, ListEnvelope};
use crate::models::aggregates::recompute_average_rating;
use crate::models::bootcamp;
use crate::models::review::{self, ReviewPayload};
use crate::store::{FilterSpec, Populate};

use super::errors::{ApiError, ApiResult};
use super::extract::AuthUser;
use super::response::{CountedBody, DataBody};
use super::state::AppState;

use std::collections::HashMap;

/// Fields a client must never set directly on a review
const PROTECTED_FIELDS: [&str; 4] = ["id", "user", "created_at", "bootcamp"];

/// Review router, mounted under `/api/v1/reviews`
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews))
        .route("/:id", get(get_review).put(update_review).delete(delete_review))
}

/// The populate descriptor every review read uses
fn bootcamp_populate() -> Populate {
    Populate::reference_with_select(
        review::BOOTCAMP_FIELD,
        bootcamp::COLLECTION,
        vec!["name".to_string(), "description".to_string()],
    )
}

/// Fetch a review document or 404
fn fetch_review(state: &AppState, id: &str) -> ApiResult<Value> {
    state
        .store
        .get(review::COLLECTION, id)?
        .ok_or_else(|| ApiError::not_found("Review", id))
}

/// GET /api/v1/reviews
async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ListEnvelope>> {
    let envelope = listing::run(
        state.store.as_ref(),
        review::COLLECTION,
        Some(bootcamp_populate()),
        &params,
    )?;
    Ok(Json(envelope))
}

/// GET /api/v1/bootcamps/{id}/reviews
pub(crate) async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> ApiResult<Json<CountedBody>> {
    let filter = FilterSpec::field_eq(review::BOOTCAMP_FIELD, json!(bootcamp_id));
    let reviews = state
        .store
        .execute(&state.store.find(review::COLLECTION, filter))?;

    Ok(Json(CountedBody::new(reviews)))
}

/// GET /api/v1/reviews/{id}
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    let query = state
        .store
        .find(review::COLLECTION, FilterSpec::field_eq("id", json!(id.clone())))
        .populate(bootcamp_populate());

    let mut results = state.store.execute(&query)?;
    if results.is_empty() {
        return Err(ApiError::not_found("Review", &id));
    }

    Ok(Json(DataBody::new(results.remove(0))))
}

/// POST /api/v1/bootcamps/{id}/reviews
pub(crate) async fn create_for_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bootcamp_id): Path<String>,
    Json(payload): Json<ReviewPayload>,
) -> ApiResult<(StatusCode, Json<DataBody>)> {
    authorize(user.role, &[Role::User, Role::Admin])?;

    if state.store.get(bootcamp::COLLECTION, &bootcamp_id)?.is_none() {
        return Err(ApiError::not_found("Bootcamp", &bootcamp_id));
    }

    if review::already_reviewed(state.store.as_ref(), &bootcamp_id, &user.id)? {
        return Err(ApiError::bad_request(
            "You have already reviewed this bootcamp",
        ));
    }

    payload.validate()?;
    let stored = state.store.insert(
        review::COLLECTION,
        payload.into_document(&bootcamp_id, &user.id),
    )?;

    recompute_average_rating(state.store.as_ref(), &bootcamp_id)?;

    Ok((StatusCode::CREATED, Json(DataBody::new(stored))))
}

/// PUT /api/v1/reviews/{id}
async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> ApiResult<Json<DataBody>> {
    let doc = fetch_review(&state, &id)?;
    require_owner(
        user.role,
        &user.id,
        doc.get("user").and_then(Value::as_str).unwrap_or_default(),
    )?;

    let changes = super::sanitize_changes(changes, &PROTECTED_FIELDS, |_| {})?;
    validate_partial(&changes)?;

    let updated = state
        .store
        .update(review::COLLECTION, &id, &changes)?
        .ok_or_else(|| ApiError::not_found("Review", &id))?;

    if let Some(bootcamp_id) = doc.get(review::BOOTCAMP_FIELD).and_then(Value::as_str) {
        recompute_average_rating(state.store.as_ref(), bootcamp_id)?;
    }

    Ok(Json(DataBody::new(updated)))
}

/// DELETE /api/v1/reviews/{id}
async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    let doc = fetch_review(&state, &id)?;
    require_owner(
        user.role,
        &user.id,
        doc.get("user").and_then(Value::as_str).unwrap_or_default(),
    )?;

    state.store.delete(review::COLLECTION, &id)?;

    if let Some(bootcamp_id) = doc.get(review::BOOTCAMP_FIELD).and_then(Value::as_str) {
        recompute_average_rating(state.store.as_ref(), bootcamp_id)?;
    }

    Ok(Json(DataBody::new(json!({}))))
}

/// Field-level checks for partial updates
fn validate_partial(changes: &Value) -> ApiResult<()> {
    if let Some(rating) = changes.get("rating") {
        if rating.as_u64().map_or(true, |r| !(1..=10).contains(&r)) {
            return Err(ApiError::bad_request("rating: must be between 1 and 10"));
        }
    }
    Ok(())
}
