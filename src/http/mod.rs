//! # HTTP Layer
//!
//! Per-resource routers nested under `/api/v1`, a shared application state,
//! and one error type everything maps into.

pub mod auth_routes;
pub mod bootcamp_routes;
pub mod course_routes;
pub mod errors;
pub mod extract;
pub mod response;
pub mod review_routes;
pub mod server;
pub mod state;
pub mod user_routes;

pub use errors::{ApiError, ApiResult};
pub use extract::AuthUser;
pub use response::{CountedBody, DataBody};
pub use server::{build_router, ApiServer};
pub use state::AppState;

use serde_json::Value;

/// Drop fields a client must not set directly, then let the caller adjust
/// derived ones before the merge
pub(crate) fn sanitize_changes<F>(
    mut changes: Value,
    protected: &[&str],
    adjust: F,
) -> ApiResult<Value>
where
    F: FnOnce(&mut serde_json::Map<String, Value>),
{
    let obj = changes
        .as_object_mut()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

    for field in protected {
        obj.remove(*field);
    }

    adjust(obj);
    Ok(changes)
}
