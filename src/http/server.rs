//! # HTTP Server
//!
//! Router assembly and the serving loop.

use std::net::SocketAddr;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::observability::{Logger, Severity};

use super::auth_routes::auth_routes;
use super::bootcamp_routes::bootcamp_routes;
use super::course_routes::course_routes;
use super::review_routes::review_routes;
use super::state::AppState;
use super::user_routes::user_routes;

/// The campdir API server
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    /// Create a server with fresh state from configuration
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::from_config(&config);
        Self::with_state(config, state)
    }

    /// Create a server over existing state (used by the seeder and tests)
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let router = build_router(state, &config);
        Self { config, router }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start serving (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}", e)))?;

        Logger::log(
            Severity::Info,
            "server_started",
            &[("addr", &addr.to_string())],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_origins.is_empty() {
        // No origins configured: permissive, for development
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/bootcamps", bootcamp_routes())
        .nest("/api/v1/courses", course_routes())
        .nest("/api/v1/reviews", review_routes())
        .nest("/api/v1/users", user_routes())
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// One structured log line per request
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    Logger::log(
        Severity::Info,
        "request",
        &[("method", &method), ("path", &path), ("status", &status)],
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let config = ServerConfig::default();
        let server = ApiServer::new(config);
        let _router = server.router();
        // If we get here, every route registered cleanly
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..ServerConfig::default()
        };
        let server = ApiServer::new(config);
        let _router = server.router();
    }
}
