//! Card types: title, description, status state machine, version, due date
//! and the immutable card entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CardId, MembershipId};

/// Card title (trimmed, 1 to 200 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CardTitle(String);

impl CardTitle {
    pub const MAX_LEN: usize = 200;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::Empty {
                field: "card title",
            });
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "card title",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CardTitle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Card description (up to 2000 characters, empty allowed).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CardDescription(String);

impl CardDescription {
    pub const MAX_LEN: usize = 2000;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "card description",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for CardDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CardDescription {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Card workflow status.
///
/// Transition table (no self-transitions):
///
/// | from        | allowed to        |
/// |-------------|-------------------|
/// | todo        | in_progress, done |
/// | in_progress | done, todo        |
/// | done        | in_progress       |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Todo,
    InProgress,
    Done,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Todo => "todo",
            CardStatus::InProgress => "in_progress",
            CardStatus::Done => "done",
        }
    }

    pub fn is_todo(&self) -> bool {
        matches!(self, CardStatus::Todo)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, CardStatus::InProgress)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, CardStatus::Done)
    }

    pub fn can_transition_to(&self, next: CardStatus) -> bool {
        match self {
            CardStatus::Todo => matches!(next, CardStatus::InProgress | CardStatus::Done),
            CardStatus::InProgress => matches!(next, CardStatus::Done | CardStatus::Todo),
            CardStatus::Done => matches!(next, CardStatus::InProgress),
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CardStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(CardStatus::Todo),
            "in_progress" => Ok(CardStatus::InProgress),
            "done" => Ok(CardStatus::Done),
            _ => Err(DomainError::UnknownValue {
                field: "card status",
                value: s.to_string(),
            }),
        }
    }
}

/// Monotonically increasing card revision number (1-based).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64")]
pub struct CardVersion(i64);

impl CardVersion {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::NotPositive {
                field: "card version",
            });
        }
        Ok(Self(value))
    }

    pub fn initial() -> Self {
        Self(1)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn increment(&self) -> CardVersion {
        Self(self.0 + 1)
    }

    pub fn is_newer(&self, other: CardVersion) -> bool {
        self.0 > other.0
    }
}

impl std::fmt::Display for CardVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for CardVersion {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Card due date with overdue/soon predicates against wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Like [`DueDate::new`] but rejects instants that are not in the future.
    pub fn in_future(value: DateTime<Utc>) -> Result<Self, DomainError> {
        if value <= Utc::now() {
            return Err(DomainError::DueDateNotFuture);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_overdue(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Due within `days_threshold` days from now and not yet overdue.
    pub fn is_soon(&self, days_threshold: i64) -> bool {
        let threshold = Utc::now() + Duration::days(days_threshold);
        self.0 <= threshold && !self.is_overdue()
    }

    /// Whole days until the due date, rounded up. Negative when overdue.
    pub fn days_until_due(&self) -> i64 {
        let secs = (self.0 - Utc::now()).num_seconds();
        if secs > 0 {
            (secs + 86_399) / 86_400
        } else {
            secs / 86_400
        }
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A kanban card.
///
/// Immutable: every mutation returns a new card, so a stale reference can
/// never observe a half-applied change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    card_id: CardId,
    title: CardTitle,
    description: CardDescription,
    status: CardStatus,
    due_date: DueDate,
    assignee_membership_id: Option<MembershipId>,
}

impl Card {
    pub fn new(
        card_id: CardId,
        title: CardTitle,
        description: CardDescription,
        status: CardStatus,
        due_date: DueDate,
        assignee_membership_id: Option<MembershipId>,
    ) -> Self {
        Self {
            card_id,
            title,
            description,
            status,
            due_date,
            assignee_membership_id,
        }
    }

    pub fn id(&self) -> CardId {
        self.card_id
    }

    pub fn title(&self) -> &CardTitle {
        &self.title
    }

    pub fn description(&self) -> &CardDescription {
        &self.description
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn due_date(&self) -> DueDate {
        self.due_date
    }

    pub fn assignee_membership_id(&self) -> Option<MembershipId> {
        self.assignee_membership_id
    }

    pub fn change_status(&self, next: CardStatus) -> Result<Card, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        Ok(Card {
            status: next,
            ..self.clone()
        })
    }

    pub fn start(&self) -> Result<Card, DomainError> {
        self.change_status(CardStatus::InProgress)
    }

    pub fn complete(&self) -> Result<Card, DomainError> {
        self.change_status(CardStatus::Done)
    }

    /// Move a completed card back into progress.
    pub fn reopen(&self) -> Result<Card, DomainError> {
        if !self.status.is_done() {
            return Err(DomainError::ReopenNotAllowed);
        }
        Ok(Card {
            status: CardStatus::InProgress,
            ..self.clone()
        })
    }

    pub fn update_title(&self, title: CardTitle) -> Card {
        Card {
            title,
            ..self.clone()
        }
    }

    pub fn update_description(&self, description: CardDescription) -> Card {
        Card {
            description,
            ..self.clone()
        }
    }

    pub fn assign_to(&self, membership_id: MembershipId) -> Card {
        Card {
            assignee_membership_id: Some(membership_id),
            ..self.clone()
        }
    }

    pub fn unassign(&self) -> Card {
        Card {
            assignee_membership_id: None,
            ..self.clone()
        }
    }

    pub fn change_due_date(&self, due_date: DueDate) -> Card {
        Card {
            due_date,
            ..self.clone()
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignee_membership_id.is_some()
    }

    /// Overdue means past due and not yet done.
    pub fn is_overdue(&self) -> bool {
        !self.status.is_done() && self.due_date.is_overdue()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.card_id.to_string(),
            "title": self.title.as_str(),
            "description": self.description.as_str(),
            "status": self.status.as_str(),
            "dueDate": self.due_date.value().to_rfc3339(),
            "assigneeMembershipId": self.assignee_membership_id.map(|id| id.to_string()),
        })
    }
}
