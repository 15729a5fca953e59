//! # Course Routes
//!
//! Flat `/api/v1/courses` endpoints plus the bootcamp-scoped handlers
//! mounted from the bootcamp router.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::auth::{authorize, require_owner, Role};
use crate::listing::{self, ListEnvelope};
use crate::models::aggregates::recompute_average_cost;
use crate::models::bootcamp;
use crate::models::course::{self, CoursePayload};
use crate::store::{FilterSpec, Populate};

use super::errors::{ApiError, ApiResult};
use super::extract::AuthUser;
use super::response::{CountedBody, DataBody};
use super::state::AppState;

use std::collections::HashMap;

/// Fields a client must never set directly on a course
const PROTECTED_FIELDS: [&str; 4] = ["id", "user", "created_at", "bootcamp"];

/// Course router, mounted under `/api/v1/courses`
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

/// The populate descriptor every course read uses
fn bootcamp_populate() -> Populate {
    Populate::reference_with_select(
        course::BOOTCAMP_FIELD,
        bootcamp::COLLECTION,
        vec!["name".to_string(), "description".to_string()],
    )
}

/// Fetch a course document or 404
fn fetch_course(state: &AppState, id: &str) -> ApiResult<Value> {
    state
        .store
        .get(course::COLLECTION, id)?
        .ok_or_else(|| ApiError::not_found("Course", id))
}

/// GET /api/v1/courses
async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ListEnvelope>> {
    let envelope = listing::run(
        state.store.as_ref(),
        course::COLLECTION,
        Some(bootcamp_populate()),
        &params,
    )?;
    Ok(Json(envelope))
}

/// GET /api/v1/bootcamps/{id}/courses
pub(crate) async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> ApiResult<Json<CountedBody>> {
    let filter = FilterSpec::field_eq(course::BOOTCAMP_FIELD, json!(bootcamp_id));
    let courses = state
        .store
        .execute(&state.store.find(course::COLLECTION, filter))?;

    Ok(Json(CountedBody::new(courses)))
}

/// GET /api/v1/courses/{id}
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    let query = state
        .store
        .find(course::COLLECTION, FilterSpec::field_eq("id", json!(id.clone())))
        .populate(bootcamp_populate());

    let mut results = state.store.execute(&query)?;
    if results.is_empty() {
        return Err(ApiError::not_found("Course", &id));
    }

    Ok(Json(DataBody::new(results.remove(0))))
}

/// POST /api/v1/bootcamps/{id}/courses
pub(crate) async fn create_for_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bootcamp_id): Path<String>,
    Json(payload): Json<CoursePayload>,
) -> ApiResult<(StatusCode, Json<DataBody>)> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let camp = state
        .store
        .get(bootcamp::COLLECTION, &bootcamp_id)?
        .ok_or_else(|| ApiError::not_found("Bootcamp", &bootcamp_id))?;
    require_owner(
        user.role,
        &user.id,
        camp.get("user").and_then(Value::as_str).unwrap_or_default(),
    )?;

    payload.validate()?;
    let stored = state.store.insert(
        course::COLLECTION,
        payload.into_document(&bootcamp_id, &user.id),
    )?;

    recompute_average_cost(state.store.as_ref(), &bootcamp_id)?;

    Ok((StatusCode::CREATED, Json(DataBody::new(stored))))
}

/// PUT /api/v1/courses/{id}
async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> ApiResult<Json<DataBody>> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let doc = fetch_course(&state, &id)?;
    require_owner(
        user.role,
        &user.id,
        doc.get("user").and_then(Value::as_str).unwrap_or_default(),
    )?;

    let changes = super::sanitize_changes(changes, &PROTECTED_FIELDS, |_| {})?;
    validate_partial(&changes)?;

    let updated = state
        .store
        .update(course::COLLECTION, &id, &changes)?
        .ok_or_else(|| ApiError::not_found("Course", &id))?;

    if let Some(bootcamp_id) = doc.get(course::BOOTCAMP_FIELD).and_then(Value::as_str) {
        recompute_average_cost(state.store.as_ref(), bootcamp_id)?;
    }

    Ok(Json(DataBody::new(updated)))
}

/// DELETE /api/v1/courses/{id}
async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let doc = fetch_course(&state, &id)?;
    require_owner(
        user.role,
        &user.id,
        doc.get("user").and_then(Value::as_str).unwrap_or_default(),
    )?;

    state.store.delete(course::COLLECTION, &id)?;

    if let Some(bootcamp_id) = doc.get(course::BOOTCAMP_FIELD).and_then(Value::as_str) {
        recompute_average_cost(state.store.as_ref(), bootcamp_id)?;
    }

    Ok(Json(DataBody::new(json!({}))))
}

/// Field-level checks for partial updates
fn validate_partial(changes: &Value) -> ApiResult<()> {
    if let Some(weeks) = changes.get("weeks") {
        if weeks.as_u64().map_or(true, |w| w == 0) {
            return Err(ApiError::bad_request("weeks: must be at least 1"));
        }
    }
    if let Some(tuition) = changes.get("tuition") {
        if tuition.as_f64().map_or(true, |t| t < 0.0) {
            return Err(ApiError::bad_request("tuition: must not be negative"));
        }
    }
    Ok(())
}
