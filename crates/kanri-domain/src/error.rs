//! Uniform error type for domain validation and business rules.

use thiserror::Error;

use crate::card::CardStatus;

/// Raised by validating constructors and state transitions.
///
/// Validation failures and business-rule violations share one type so
/// callers can translate them uniformly at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("invalid {field}: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid image url: {0}")]
    InvalidImageUrl(String),

    #[error("Due date must be in the future")]
    DueDateNotFuture,

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: CardStatus, to: CardStatus },

    #[error("Only completed cards can be reopened")]
    ReopenNotAllowed,

    #[error("Cannot accept invitation: either expired or not pending")]
    InvitationNotAcceptable,

    #[error("Cannot reject invitation: not pending")]
    InvitationNotPending,
}
