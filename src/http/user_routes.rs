//! # User Management Routes
//!
//! Admin-only CRUD over the users collection.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::auth::user::{self, RegisterRequest};
use crate::auth::{authorize, Role};
use crate::listing::{self, ListEnvelope};

use super::errors::{ApiError, ApiResult};
use super::extract::AuthUser;
use super::response::DataBody;
use super::state::AppState;

use std::collections::HashMap;

/// User router, mounted under `/api/v1/users`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn require_admin(caller: &AuthUser) -> ApiResult<()> {
    authorize(caller.role, &[Role::Admin])?;
    Ok(())
}

/// GET /api/v1/users
async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ListEnvelope>> {
    require_admin(&caller)?;

    let mut envelope = listing::run(state.store.as_ref(), user::COLLECTION, None, &params)?;
    for doc in &mut envelope.data {
        user::scrub(doc);
    }

    Ok(Json(envelope))
}

/// GET /api/v1/users/{id}
async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    require_admin(&caller)?;

    let mut doc = state
        .store
        .get(user::COLLECTION, &id)?
        .ok_or_else(|| ApiError::not_found("User", &id))?;
    user::scrub(&mut doc);

    Ok(Json(DataBody::new(doc)))
}

/// POST /api/v1/users
async fn create_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<DataBody>)> {
    require_admin(&caller)?;

    let created = state.auth.create_user(request)?;
    Ok((StatusCode::CREATED, Json(DataBody::new(created))))
}

/// PUT /api/v1/users/{id}
async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> ApiResult<Json<DataBody>> {
    require_admin(&caller)?;

    if state.store.get(user::COLLECTION, &id)?.is_none() {
        return Err(ApiError::not_found("User", &id));
    }

    let changes = super::sanitize_changes(changes, &["id", "created_at", "password_hash"], |_| {})?;
    let updated = state.auth.admin_update_user(&id, changes)?;

    Ok(Json(DataBody::new(updated)))
}

/// DELETE /api/v1/users/{id}
async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataBody>> {
    require_admin(&caller)?;

    if !state.store.delete(user::COLLECTION, &id)? {
        return Err(ApiError::not_found("User", &id));
    }

    Ok(Json(DataBody::new(json!({}))))
}
