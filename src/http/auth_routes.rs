//! # Auth Routes
//!
//! Registration, login and account management endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::json;

use crate::auth::user::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateDetailsRequest, UpdatePasswordRequest,
};
use crate::auth::TokenResponse;

use super::errors::ApiResult;
use super::extract::AuthUser;
use super::response::DataBody;
use super::state::AppState;

/// Auth router, mounted under `/api/v1/auth`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/update-details", put(update_details))
        .route("/update-password", put(update_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:resettoken", put(reset_password))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let (_user, token) = state.auth.register(request)?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.auth.login(request)?;
    Ok(Json(token))
}

/// GET /api/v1/auth/me
async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<DataBody>> {
    let profile = state.auth.me(&user.id)?;
    Ok(Json(DataBody::new(profile)))
}

/// PUT /api/v1/auth/update-details
async fn update_details(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateDetailsRequest>,
) -> ApiResult<Json<DataBody>> {
    let profile = state.auth.update_details(&user.id, request)?;
    Ok(Json(DataBody::new(profile)))
}

/// PUT /api/v1/auth/update-password
async fn update_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.auth.update_password(&user.id, request)?;
    Ok(Json(token))
}

/// POST /api/v1/auth/forgot-password
async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<DataBody>> {
    state.auth.forgot_password(&request.email)?;
    Ok(Json(DataBody::new(json!("Email sent"))))
}

/// PUT /api/v1/auth/reset-password/{resettoken}
async fn reset_password(
    State(state): State<AppState>,
    Path(resettoken): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.auth.reset_password(&resettoken, &request.password)?;
    Ok(Json(token))
}
