use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

const FALLBACK_NAME: &str = "Student";

/// A signed-in learner as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, email: Option<String>, full_name: Option<String>) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        Self {
            id,
            email: clean(email),
            full_name: clean(full_name),
        }
    }

    fn email_local_part(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
    }

    /// Full name, else the email local part, else "Student".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or_else(|| self.email_local_part())
            .unwrap_or(FALLBACK_NAME)
    }

    /// First word of the full name, else the email local part, else "Student".
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .or_else(|| self.email_local_part())
            .unwrap_or(FALLBACK_NAME)
    }

    /// Upper-cased first character of the email, used for avatars.
    #[must_use]
    pub fn initial(&self) -> String {
        self.email
            .as_deref()
            .and_then(|email| email.chars().next())
            .or_else(|| self.display_name().chars().next())
            .map(|ch| ch.to_uppercase().collect::<String>())
            .unwrap_or_else(|| "?".to_owned())
    }
}

/// An authenticated session issued by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn new(user: User, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_fall_back_in_order() {
        let full = User::new(
            UserId::new("1"),
            Some("alex.design@example.com".into()),
            Some("Alex Johnson".into()),
        );
        assert_eq!(full.display_name(), "Alex Johnson");
        assert_eq!(full.first_name(), "Alex");
        assert_eq!(full.initial(), "A");

        let email_only = User::new(
            UserId::new("2"),
            Some("sam@example.com".into()),
            Some("  ".into()),
        );
        assert_eq!(email_only.display_name(), "sam");
        assert_eq!(email_only.first_name(), "sam");

        let anonymous = User::new(UserId::new("3"), None, None);
        assert_eq!(anonymous.display_name(), "Student");
        assert_eq!(anonymous.initial(), "S");
    }

    #[test]
    fn session_expiry_is_optional() {
        let user = User::new(UserId::new("1"), None, None);
        let session = Session::new(user, "token");
        assert!(!session.is_expired(crate::time::fixed_now()));
    }
}
