//! Card audit trail: versioned snapshots and the actions that produced them.
//!
//! History and activity rows are append-only. They are recorded after a
//! card operation completes and are never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardDescription, CardStatus, CardTitle, CardVersion, DueDate};
use crate::error::DomainError;
use crate::ids::{ActivityId, BoardId, CardId, HistoryId, MembershipId};

/// The card operation an activity row records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Create,
    UpdateTitle,
    UpdateDescription,
    ChangeStatus,
    Reopen,
    Assign,
    Unassign,
    ChangeDueDate,
    Delete,
}

impl std::fmt::Display for CardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CardAction::Create => "card.create",
            CardAction::UpdateTitle => "card.update_title",
            CardAction::UpdateDescription => "card.update_description",
            CardAction::ChangeStatus => "card.change_status",
            CardAction::Reopen => "card.reopen",
            CardAction::Assign => "card.assign",
            CardAction::Unassign => "card.unassign",
            CardAction::ChangeDueDate => "card.change_due_date",
            CardAction::Delete => "card.delete",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for CardAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card.create" => Ok(CardAction::Create),
            "card.update_title" => Ok(CardAction::UpdateTitle),
            "card.update_description" => Ok(CardAction::UpdateDescription),
            "card.change_status" => Ok(CardAction::ChangeStatus),
            "card.reopen" => Ok(CardAction::Reopen),
            "card.assign" => Ok(CardAction::Assign),
            "card.unassign" => Ok(CardAction::Unassign),
            "card.change_due_date" => Ok(CardAction::ChangeDueDate),
            "card.delete" => Ok(CardAction::Delete),
            _ => Err(DomainError::UnknownValue {
                field: "card action",
                value: s.to_string(),
            }),
        }
    }
}

/// Versioned snapshot of a card at the moment an action was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardHistory {
    pub history_id: HistoryId,
    pub card_id: CardId,
    pub version: CardVersion,
    pub board_id: BoardId,
    pub assignee_membership_id: Option<MembershipId>,
    pub actor_membership_id: MembershipId,
    pub title: CardTitle,
    pub description: CardDescription,
    pub status: CardStatus,
    pub due_date: Option<DueDate>,
    pub created_at: DateTime<Utc>,
}

impl CardHistory {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        history_id: HistoryId,
        card_id: CardId,
        version: CardVersion,
        board_id: BoardId,
        assignee_membership_id: Option<MembershipId>,
        actor_membership_id: MembershipId,
        title: CardTitle,
        description: CardDescription,
        status: CardStatus,
        due_date: Option<DueDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            history_id,
            card_id,
            version,
            board_id,
            assignee_membership_id,
            actor_membership_id,
            title,
            description,
            status,
            due_date,
            created_at,
        }
    }

    /// Capture the current state of `card` as version `version`.
    pub fn snapshot(
        card: &Card,
        board_id: BoardId,
        version: CardVersion,
        actor_membership_id: MembershipId,
    ) -> Self {
        Self::new(
            HistoryId::new(),
            card.id(),
            version,
            board_id,
            card.assignee_membership_id(),
            actor_membership_id,
            card.title().clone(),
            card.description().clone(),
            card.status(),
            Some(card.due_date()),
            Utc::now(),
        )
    }

    pub fn belongs_to_card(&self, card_id: CardId) -> bool {
        self.card_id == card_id
    }

    pub fn was_acted_by(&self, membership_id: MembershipId) -> bool {
        self.actor_membership_id == membership_id
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "historyId": self.history_id.to_string(),
            "cardId": self.card_id.to_string(),
            "version": self.version.to_string(),
            "boardId": self.board_id.to_string(),
            "assigneeMembershipId": self.assignee_membership_id.map(|id| id.to_string()),
            "actorMembershipId": self.actor_membership_id.to_string(),
            "title": self.title.as_str(),
            "description": self.description.as_str(),
            "status": self.status.as_str(),
            "dueDate": self.due_date.map(|d| d.value().to_rfc3339()),
            "createdAt": self.created_at.to_rfc3339(),
        })
    }
}

/// One recorded card action, pointing at the snapshot it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardActivity {
    pub activity_id: ActivityId,
    pub card_id: CardId,
    pub history_id: HistoryId,
    pub actor_membership_id: MembershipId,
    pub action: CardAction,
    pub created_at: DateTime<Utc>,
}

impl CardActivity {
    pub fn new(
        activity_id: ActivityId,
        card_id: CardId,
        history_id: HistoryId,
        actor_membership_id: MembershipId,
        action: CardAction,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            activity_id,
            card_id,
            history_id,
            actor_membership_id,
            action,
            created_at,
        }
    }

    /// Record `action` against the snapshot identified by `history_id`.
    pub fn record(
        card_id: CardId,
        history_id: HistoryId,
        actor_membership_id: MembershipId,
        action: CardAction,
    ) -> Self {
        Self::new(
            ActivityId::new(),
            card_id,
            history_id,
            actor_membership_id,
            action,
            Utc::now(),
        )
    }

    pub fn belongs_to_card(&self, card_id: CardId) -> bool {
        self.card_id == card_id
    }

    pub fn was_performed_by(&self, membership_id: MembershipId) -> bool {
        self.actor_membership_id == membership_id
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "activityId": self.activity_id.to_string(),
            "cardId": self.card_id.to_string(),
            "historyId": self.history_id.to_string(),
            "actorMembershipId": self.actor_membership_id.to_string(),
            "action": self.action.to_string(),
            "createdAt": self.created_at.to_rfc3339(),
        })
    }
}
