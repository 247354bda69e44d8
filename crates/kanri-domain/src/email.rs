//! Email address value object.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated, lowercased email address.
///
/// Two addresses differing only by case compare equal because the value is
/// normalized to lowercase at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let candidate = value.as_ref().trim();
        if !is_valid_shape(candidate) {
            return Err(DomainError::InvalidEmail(value.as_ref().to_string()));
        }
        Ok(Self(candidate.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(local, _)| local).unwrap_or(&self.0)
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, domain)| domain).unwrap_or("")
    }
}

/// Shape check only: one `@`, non-empty local part, dotted domain.
fn is_valid_shape(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if s.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_on_construction() {
        let email = EmailAddress::new("Test@Example.COM").unwrap();
        assert_eq!(email.as_str(), "test@example.com");
    }

    #[test]
    fn case_insensitive_equality() {
        let a = EmailAddress::new("USER@host.example").unwrap();
        let b = EmailAddress::new("user@HOST.example").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn splits_local_part_and_domain() {
        let email = EmailAddress::new("alice@example.com").unwrap();
        assert_eq!(email.local_part(), "alice");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@nodot",
            "user@.example.com",
            "user@example.com.",
            "user@exa..mple.com",
            "user name@example.com",
            "user@exam@ple.com",
        ] {
            assert!(EmailAddress::new(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = EmailAddress::new("  bob@example.com  ").unwrap();
        assert_eq!(email.as_str(), "bob@example.com");
    }
}
