//! Authentication configuration

/// Configuration needed to validate bearer tokens issued by the external
/// auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}
