//! User model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

fn default_active() -> bool {
    true
}

/// A member of a review team.
///
/// A user belongs to exactly one team. Inactive users stay in the database
/// but are never selected as reviewers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    /// Owning team (foreign key to `teams`).
    pub team_name: String,
    /// Defaults to true when omitted from a request payload.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_defaults_to_true() {
        let user: User = serde_json::from_str(
            r#"{"user_id":"u1","username":"Alice","team_name":"backend"}"#,
        )
        .unwrap();
        assert!(user.is_active);
    }

    #[test]
    fn test_is_active_respected_when_present() {
        let user: User = serde_json::from_str(
            r#"{"user_id":"u1","username":"Alice","team_name":"backend","is_active":false}"#,
        )
        .unwrap();
        assert!(!user.is_active);
    }
}
