//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by bearer tokens issued by the external auth service.
///
/// `email`/`display_name` are used directly when present, without a
/// remote lookup against the user service.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    pub aud: Option<String>,
}
