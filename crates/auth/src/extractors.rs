//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, extract_cookie_token};

/// Authenticated user extractor.
///
/// Reads the bearer token from `Authorization: Bearer <token>`, falling
/// back to a `token` cookie when the header is absent.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let token = match parts.headers.get(AUTHORIZATION) {
            Some(header) => extract_bearer_token(header)?,
            None => parts
                .headers
                .get(COOKIE)
                .and_then(extract_cookie_token)
                .ok_or(AuthError::MissingAuthorization)?,
        };

        let auth_context = backend.authenticate(&token)?;

        Ok(AuthUser(auth_context))
    }
}
