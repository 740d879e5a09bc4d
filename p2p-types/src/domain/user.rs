//! User domain model (signup only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

const MIN_PASSWORD_LEN: usize = 8;

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

impl UserId {
    /// Creates a new random UserId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a UserId from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(uuid::Uuid::parse_str(s)?))
    }
}

/// Lifecycle state of a user. New signups start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
    Suspended,
}

impl AsRef<str> for UserStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(DomainError::ValidationError(format!(
                "Unknown user status: {}",
                other
            ))),
        }
    }
}

/// A validated signup. The password is still plaintext here and must be
/// hashed by the repository before it is stored.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Validates and normalizes signup fields.
    ///
    /// # Validation
    /// - All fields are required and cannot be blank
    /// - Email must look like `local@domain` and is lowercased
    /// - Password must be at least 8 characters
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, DomainError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        let email = email.trim().to_lowercase();

        if first_name.is_empty() || last_name.is_empty() || email.is_empty() || password.is_empty()
        {
            return Err(DomainError::ValidationError("Required fields missing".into()));
        }

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => {
                return Err(DomainError::ValidationError(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = NewUser::new(" Ada ", "Lovelace", " Ada@Example.COM ", "correct horse").unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = NewUser::new("Ada", "Lovelace", "ada@example.com", "correct horse").unwrap();
        assert!(!format!("{user:?}").contains("correct horse"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let result = NewUser::new("", "Lovelace", "ada@example.com", "password123");
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let result = NewUser::new("Ada", "Lovelace", "ada@example.com", "");
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_email_rejected() {
        for email in ["ada", "@example.com", "ada@", "a@b@c"] {
            let result = NewUser::new("Ada", "Lovelace", email, "password123");
            assert!(
                matches!(result, Err(DomainError::ValidationError(_))),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_short_password_rejected() {
        let result = NewUser::new("Ada", "Lovelace", "ada@example.com", "short");
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(UserStatus::default(), UserStatus::Pending);
        assert_eq!("active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!(UserStatus::Suspended.to_string(), "suspended");
    }
}
