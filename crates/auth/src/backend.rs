//! Concrete authentication backend
//!
//! Unlike a team-membership backend that owns a database pool, this
//! backend only validates bearer tokens issued by the external auth
//! service and lifts their claims into an `AuthContext`. Project and
//! task membership are resolved downstream, never here.

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a bearer token and lift its claims into an `AuthContext`.
    pub(crate) fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        Ok(AuthContext::new(user_id, claims.email, claims.display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    fn encode_token(config: &AuthConfig, sub: &str) -> String {
        let claims = crate::claims::TokenClaims {
            sub: sub.to_string(),
            email: Some("test@example.com".to_string()),
            display_name: None,
            iat: chrono::Utc::now().timestamp() as u64,
            exp: (chrono::Utc::now().timestamp() + 3600) as u64,
            aud: None,
        };
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(config.secret.as_ref());
        jsonwebtoken::encode(&header, &claims, &key).unwrap()
    }

    #[test]
    fn test_authenticate_valid_token() {
        let config = AuthConfig {
            secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        };
        let backend = AuthBackend::new(config.clone());
        let user_id = Uuid::new_v4();
        let token = encode_token(&config, &user_id.to_string());

        let ctx = backend.authenticate(&token).unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_authenticate_rejects_invalid_user_id() {
        let config = AuthConfig {
            secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        };
        let backend = AuthBackend::new(config.clone());
        let token = encode_token(&config, "not-a-uuid");

        assert!(matches!(
            backend.authenticate(&token),
            Err(AuthError::InvalidUserId)
        ));
    }

    #[test]
    fn test_authenticate_rejects_wrong_secret() {
        let config = AuthConfig {
            secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        };
        let other = AuthConfig {
            secret: "other-secret".to_string(),
            issuer: None,
            audience: None,
        };
        let backend = AuthBackend::new(other);
        let token = encode_token(&config, &Uuid::new_v4().to_string());

        assert!(matches!(
            backend.authenticate(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
