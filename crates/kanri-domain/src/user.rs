//! User types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::email::EmailAddress;
use crate::error::DomainError;
use crate::ids::UserId;

/// User display name (trimmed, 1 to 100 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct UserName(String);

impl UserName {
    pub const MAX_LEN: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::Empty { field: "user name" });
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "user name",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// User record. Soft-deleted via `deleted_at`; rows are never removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        name: UserName,
        email: EmailAddress,
        image: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if let Some(ref image) = image {
            Url::parse(image).map_err(|_| DomainError::InvalidImageUrl(image.clone()))?;
        }
        Ok(Self {
            user_id,
            name,
            email,
            image,
            created_at,
            updated_at,
            deleted_at,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Copy marked as deleted at `deleted_at`.
    pub fn deleted(&self, deleted_at: DateTime<Utc>) -> User {
        User {
            deleted_at: Some(deleted_at),
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "userId": self.user_id.to_string(),
            "name": self.name.as_str(),
            "email": self.email.as_str(),
            "image": self.image,
            "createdAt": self.created_at.to_rfc3339(),
            "updatedAt": self.updated_at.to_rfc3339(),
            "deletedAt": self.deleted_at.map(|t| t.to_rfc3339()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(image: Option<&str>) -> Result<User, DomainError> {
        let now = Utc::now();
        User::new(
            UserId::new(),
            UserName::new("Alice").unwrap(),
            EmailAddress::new("alice@example.com").unwrap(),
            image.map(String::from),
            now,
            now,
            None,
        )
    }

    #[test]
    fn test_user_name_bounds() {
        assert!(UserName::new("Alice").is_ok());
        assert!(UserName::new("").is_err());
        assert!(UserName::new("a".repeat(101)).is_err());
    }

    #[test]
    fn test_image_url_validated_when_present() {
        assert!(test_user(None).is_ok());
        assert!(test_user(Some("https://example.com/avatar.png")).is_ok());
        assert!(test_user(Some("not a url")).is_err());
    }

    #[test]
    fn test_soft_delete() {
        let user = test_user(None).unwrap();
        assert!(!user.is_deleted());

        let deleted = user.deleted(Utc::now());
        assert!(deleted.is_deleted());
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_to_json_shape() {
        let user = test_user(None).unwrap();
        let json = user.to_json();
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["image"], serde_json::Value::Null);
        assert_eq!(json["deletedAt"], serde_json::Value::Null);
    }
}
