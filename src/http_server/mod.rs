//! # HTTP Server Module
//!
//! Axum server exposing the news and events collections.
//!
//! # Endpoints
//!
//! - `/` and `/health` - liveness (public)
//! - `POST /api/login` - bearer token issuance (public)
//! - `POST /api/{news,events}` - filtered, paginated lists (bearer token)
//! - `GET /api/{news,events}/{id}` - single record lookup (bearer token)

pub mod auth_gate;
pub mod auth_routes;
pub mod body;
pub mod config;
pub mod error;
pub mod resource_routes;
pub mod server;
pub mod state;

pub use auth_gate::AuthenticatedUser;
pub use config::HttpServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, with_middleware, HttpServer};
pub use state::AppState;
