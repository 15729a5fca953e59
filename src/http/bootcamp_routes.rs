//! # Bootcamp Routes
//!
//! CRUD plus radius search and photo upload. Bootcamp-scoped course and
//! review endpoints are mounted here and re-routed into their own modules.

use axum::extract::{Json, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::Router;
use serde_json::{json, Value};

use crate::auth::{authorize, require_owner, Role};
use crate::geo;
use crate::listing::{self, ListEnvelope};
use crate::models::bootcamp::{self, slugify, BootcampPayload};
use crate::models::course;
use crate::store::{FilterSpec, Populate};
use crate::uploads::UploadError;

use super::errors::{ApiError, ApiResult};
use super::extract::AuthUser;
use super::response::{CountedBody, DataBody};
use super::state::AppState;
use super::{course_routes, review_routes};

use std::collections::HashMap;

/// Bootcamp router, mounted under `/api/v1/bootcamps`
pub fn bootcamp_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bootcamps).post(create_bootcamp))
        .route("/radius/:zipcode/:distance", get(bootcamps_in_radius))
        .route(
            "/:id",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        .route("/:id/photo", put(upload_photo))
        // Re-route into the other resource routers
        .route(
            "/:id/courses",
            get(course_routes::list_for_bootcamp).post(course_routes::create_for_bootcamp),
        )
        .route(
            "/:id/reviews",
            get(review_routes::list_for_bootcamp).post(review_routes::create_for_bootcamp),
        )
}

/// Fetch a bootcamp document or 404
fn fetch_bootcamp(state: &AppState, id: &str) -> ApiResult<Value> {
    state
        .store
        .get(bootcamp::COLLECTION, id)?
        .ok_or_else(|| ApiError::not_found("Bootcamp", id))
}

/// The owner id recorded on a document
fn owner_of(doc: &Value) -> &str {
    doc.get("user").and_then(Value::as_str).unwrap_or_default()
}

/// GET /api/v1/bootcamps
async fn list_bootcamps(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ListEnvelope>> {
    let envelope = listing::run(
        state.store.as_ref(),
        bootcamp::COLLECTION,
        Some(Populate::children(
            "courses",
            course::COLLECTION,
            course::BOOTCAMP_FIELD,
        )),
        &params,
    )?;
    Ok(Json(envelope))
}

/// GET /api/v1/bootcamps/{id}
async fn get_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    let doc = fetch_bootcamp(&state, &id)?;
    Ok(Json(DataBody::new(doc)))
}

/// POST /api/v1/bootcamps
///
/// Publishers get one bootcamp each; admins are unrestricted.
async fn create_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BootcampPayload>,
) -> ApiResult<(StatusCode, Json<DataBody>)> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    if user.role != Role::Admin && bootcamp::has_published(state.store.as_ref(), &user.id)? {
        return Err(ApiError::bad_request(format!(
            "The user with ID {} has already published a bootcamp",
            user.id
        )));
    }

    payload.validate()?;
    let stored = state
        .store
        .insert(bootcamp::COLLECTION, payload.into_document(&user.id))?;

    Ok((StatusCode::CREATED, Json(DataBody::new(stored))))
}

/// PUT /api/v1/bootcamps/{id}
async fn update_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> ApiResult<Json<DataBody>> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let doc = fetch_bootcamp(&state, &id)?;
    require_owner(user.role, &user.id, owner_of(&doc))?;

    let changes = super::sanitize_changes(changes, &PROTECTED_FIELDS, |obj| {
        // The slug tracks the name
        if let Some(name) = obj.get("name").and_then(Value::as_str) {
            let slug = slugify(name);
            obj.insert("slug".to_string(), Value::String(slug));
        }
    })?;

    let updated = state
        .store
        .update(bootcamp::COLLECTION, &id, &changes)?
        .ok_or_else(|| ApiError::not_found("Bootcamp", &id))?;

    Ok(Json(DataBody::new(updated)))
}

/// DELETE /api/v1/bootcamps/{id}
///
/// Cascades to the bootcamp's courses and reviews.
async fn delete_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let doc = fetch_bootcamp(&state, &id)?;
    require_owner(user.role, &user.id, owner_of(&doc))?;

    bootcamp::cascade_delete(state.store.as_ref(), &id)?;

    Ok(Json(DataBody::new(json!({}))))
}

/// GET /api/v1/bootcamps/radius/{zipcode}/{distance}
///
/// Distance is in miles; the zipcode is resolved through the geocoder.
async fn bootcamps_in_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, f64)>,
) -> ApiResult<Json<CountedBody>> {
    let center = state.geocoder.geocode(&zipcode)?;

    let all = state
        .store
        .execute(&state.store.find(bootcamp::COLLECTION, FilterSpec::empty()))?;
    let within = geo::filter_within_radius(all, &center, distance);

    Ok(Json(CountedBody::new(within)))
}

/// PUT /api/v1/bootcamps/{id}/photo
async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<DataBody>> {
    authorize(user.role, &[Role::Publisher, Role::Admin])?;

    let doc = fetch_bootcamp(&state, &id)?;
    require_owner(user.role, &user.id, owner_of(&doc))?;

    let mut stored_name = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("photo.jpg").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        stored_name = Some(
            state
                .photos
                .store_photo(&id, &original_name, &content_type, &data)?,
        );
        break;
    }

    let filename = stored_name.ok_or(UploadError::MissingFile)?;
    state
        .store
        .update(bootcamp::COLLECTION, &id, &json!({ "photo": filename }))?;

    Ok(Json(DataBody::new(json!(filename))))
}

/// Fields a client must never set directly on a bootcamp
pub(crate) const PROTECTED_FIELDS: [&str; 7] = [
    "id",
    "user",
    "created_at",
    "slug",
    "photo",
    "average_cost",
    "average_rating",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_fields_are_stripped() {
        let changes = json!({
            "name": "New Name",
            "id": "spoofed",
            "user": "someone-else",
            "average_rating": 10
        });

        let clean = super::super::sanitize_changes(changes, &PROTECTED_FIELDS, |_| {}).unwrap();
        let obj = clean.as_object().unwrap();
        assert!(obj.contains_key("name"));
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("user"));
        assert!(!obj.contains_key("average_rating"));
    }

    #[test]
    fn test_update_recomputes_slug_via_adjust() {
        let clean = super::super::sanitize_changes(json!({"name": "New Name"}), &["id"], |obj| {
            if let Some(name) = obj.get("name").and_then(Value::as_str) {
                let slug = slugify(name);
                obj.insert("slug".to_string(), Value::String(slug));
            }
        })
        .unwrap();

        assert_eq!(clean["slug"], "new-name");
    }
}
