//! # Auth Module
//!
//! Bearer-token authentication: password verification for the login endpoint
//! and JWT issuance/verification for every protected route.

pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod jwt;

pub use credentials::{Account, CredentialStore, StaticCredentialStore};
pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager, TokenVerifier};
