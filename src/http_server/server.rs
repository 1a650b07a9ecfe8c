//! # HTTP Server
//!
//! Combines the public and protected routers, applies the middleware stack and
//! serves the result.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use super::auth_gate::require_bearer;
use super::auth_routes::auth_routes;
use super::config::HttpServerConfig;
use super::error::{ApiError, ErrorResponse};
use super::resource_routes::resource_routes;
use super::state::AppState;

/// HTTP server for the news and events API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server for `state` with the given configuration
    pub fn with_config(state: AppState, config: HttpServerConfig) -> Self {
        let router = build_router(state, &config);
        Self { config, router }
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "newsdesk listening");
        info!("  POST /api/login - obtain a bearer token");
        info!("  POST /api/news, GET /api/news/{{id}}");
        info!("  POST /api/events, GET /api/events/{{id}}");

        axum::serve(listener, self.router).await
    }
}

/// Build the complete application router
pub fn build_router(state: AppState, config: &HttpServerConfig) -> Router {
    let public = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", auth_routes());

    // Everything else requires a bearer token, unknown paths included
    let protected = Router::new()
        .nest("/api", resource_routes())
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let router = public.merge(protected).with_state(state);
    with_middleware(router, config)
}

/// Apply CORS, tracing, timeout and panic recovery to `router`
pub fn with_middleware(router: Router, config: &HttpServerConfig) -> Router {
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ));

    router
        .layer(service_builder)
        .layer(middleware::map_response(fill_error_body))
        .layer(build_cors_layer(config))
}

/// Give bodiless error responses (405, 408) the same JSON shape as route errors
async fn fill_error_body(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.headers().contains_key(CONTENT_TYPE) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let error = status.canonical_reason().unwrap_or("Error").to_string();
    (parts, Json(ErrorResponse { error })).into_response()
}

/// Builds the CORS layer; no configured origins means any origin
fn build_cors_layer(config: &HttpServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if config.cors_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Turn a handler panic into a 500 response
fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(%detail, "handler panicked");
    ApiError::Internal(detail).into_response()
}

async fn root_handler() -> &'static str {
    "newsdesk API"
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let router = Router::new().route("/boom", get(boom));
        let server = TestServer::new(with_middleware(router, &HttpServerConfig::default())).unwrap();

        let response = server.get("/boom").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let config = HttpServerConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        let server = TestServer::new(with_middleware(router, &config)).unwrap();

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::REQUEST_TIMEOUT);
        response.assert_json(&json!({ "error": "Request Timeout" }));
    }

    #[tokio::test]
    async fn test_wrong_method_has_json_body() {
        let router = Router::new().route("/only-get", get(|| async { "ok" }));
        let server = TestServer::new(with_middleware(router, &HttpServerConfig::default())).unwrap();

        let response = server.delete("/only-get").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        response.assert_json(&json!({ "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_typed_error_bodies_are_untouched() {
        let router = Router::new().route("/gone", get(|| async { ApiError::NotFound }));
        let server = TestServer::new(with_middleware(router, &HttpServerConfig::default())).unwrap();

        let response = server.get("/gone").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Not found" }));
    }
}
