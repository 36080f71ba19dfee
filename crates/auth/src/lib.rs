//! Authentication middleware for the project/task services
//!
//! Provides bearer-token validation and an axum extractor that works
//! with any domain state implementing `FromRef<S>` for `AuthBackend`.
//! Unlike a team-membership backend, this crate never queries a
//! database: user identity is resolved entirely from token claims.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;

pub use backend::AuthBackend;
pub use claims::TokenClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use jwt::{extract_bearer_token, extract_cookie_token};
