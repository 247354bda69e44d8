//! Board types.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{BoardId, BoardMembershipId, MembershipId, WorkspaceId};

/// Board display name (trimmed, 1 to 100 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct BoardName(String);

impl BoardName {
    pub const MAX_LEN: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::Empty {
                field: "board name",
            });
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "board name",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BoardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BoardName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Board record. Belongs to exactly one workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub board_id: BoardId,
    pub workspace_id: WorkspaceId,
    pub name: BoardName,
}

impl Board {
    pub fn new(board_id: BoardId, workspace_id: WorkspaceId, name: BoardName) -> Self {
        Self {
            board_id,
            workspace_id,
            name,
        }
    }

    pub fn belongs_to_workspace(&self, workspace_id: WorkspaceId) -> bool {
        self.workspace_id == workspace_id
    }

    /// Copy with a different name.
    pub fn renamed(&self, name: BoardName) -> Board {
        Board {
            name,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "boardId": self.board_id.to_string(),
            "workspaceId": self.workspace_id.to_string(),
            "name": self.name.as_str(),
        })
    }
}

/// Links a workspace membership to a board (many-to-many via membership).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMembership {
    pub board_membership_id: BoardMembershipId,
    pub board_id: BoardId,
    pub membership_id: MembershipId,
}

impl BoardMembership {
    pub fn new(
        board_membership_id: BoardMembershipId,
        board_id: BoardId,
        membership_id: MembershipId,
    ) -> Self {
        Self {
            board_membership_id,
            board_id,
            membership_id,
        }
    }

    pub fn belongs_to_board(&self, board_id: BoardId) -> bool {
        self.board_id == board_id
    }

    pub fn is_member(&self, membership_id: MembershipId) -> bool {
        self.membership_id == membership_id
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "boardMembershipId": self.board_membership_id.to_string(),
            "boardId": self.board_id.to_string(),
            "membershipId": self.membership_id.to_string(),
        })
    }
}
