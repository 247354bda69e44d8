//! Workspace types.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{UserId, WorkspaceId};

/// Workspace display name (trimmed, 1 to 100 characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct WorkspaceName(String);

impl WorkspaceName {
    pub const MAX_LEN: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(DomainError::Empty {
                field: "workspace name",
            });
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "workspace name",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WorkspaceName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Workspace record. The owner also holds an owner membership, created in
/// the same transaction as the workspace itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    pub workspace_id: WorkspaceId,
    pub name: WorkspaceName,
    pub owner_user_id: UserId,
}

impl Workspace {
    pub fn new(workspace_id: WorkspaceId, name: WorkspaceName, owner_user_id: UserId) -> Self {
        Self {
            workspace_id,
            name,
            owner_user_id,
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_user_id == user_id
    }

    /// Copy with a different name.
    pub fn renamed(&self, name: WorkspaceName) -> Workspace {
        Workspace {
            name,
            ..self.clone()
        }
    }

    /// Copy with ownership transferred to another user.
    pub fn with_owner(&self, owner_user_id: UserId) -> Workspace {
        Workspace {
            owner_user_id,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "workspaceId": self.workspace_id.to_string(),
            "name": self.name.as_str(),
            "ownerUserId": self.owner_user_id.to_string(),
        })
    }
}
