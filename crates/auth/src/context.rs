//! Authorization context for authenticated users

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the caller, resolved entirely from bearer-token claims.
///
/// Project/task services never look a user up in a database — email and
/// display name are carried straight through from the token and are
/// `None` when the issuing service didn't include them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthContext {
    pub fn new(user_id: Uuid, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            user_id,
            email,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_carries_claim_fields() {
        let user_id = Uuid::new_v4();
        let ctx = AuthContext::new(
            user_id,
            Some("test@example.com".to_string()),
            Some("Test User".to_string()),
        );

        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.email.as_deref(), Some("test@example.com"));
        assert_eq!(ctx.display_name.as_deref(), Some("Test User"));
    }

    #[test]
    fn test_auth_context_allows_missing_profile_fields() {
        let ctx = AuthContext::new(Uuid::new_v4(), None, None);
        assert!(ctx.email.is_none());
        assert!(ctx.display_name.is_none());
    }
}
