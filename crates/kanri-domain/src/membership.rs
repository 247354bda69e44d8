//! Workspace membership types.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{MembershipId, UserId, WorkspaceId};
use crate::role::RoleId;

/// Whether a member has joined or is still only invited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Invited,
    Joined,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Invited => "invited",
            MembershipStatus::Joined => "joined",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(MembershipStatus::Invited),
            "joined" => Ok(MembershipStatus::Joined),
            _ => Err(DomainError::UnknownValue {
                field: "membership status",
                value: s.to_string(),
            }),
        }
    }
}

/// Links a user to a workspace with a role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceMembership {
    pub membership_id: MembershipId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub status: MembershipStatus,
    pub role_id: RoleId,
}

impl WorkspaceMembership {
    pub fn new(
        membership_id: MembershipId,
        workspace_id: WorkspaceId,
        user_id: UserId,
        status: MembershipStatus,
        role_id: RoleId,
    ) -> Self {
        Self {
            membership_id,
            workspace_id,
            user_id,
            status,
            role_id,
        }
    }

    /// Owner membership, created together with the workspace.
    pub fn owner(workspace_id: WorkspaceId, user_id: UserId) -> Self {
        Self::new(
            MembershipId::new(),
            workspace_id,
            user_id,
            MembershipStatus::Joined,
            RoleId::OWNER,
        )
    }

    /// Regular membership, created when an invitation is accepted.
    pub fn member(workspace_id: WorkspaceId, user_id: UserId, role_id: RoleId) -> Self {
        Self::new(
            MembershipId::new(),
            workspace_id,
            user_id,
            MembershipStatus::Joined,
            role_id,
        )
    }

    pub fn belongs_to_workspace(&self, workspace_id: WorkspaceId) -> bool {
        self.workspace_id == workspace_id
    }

    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_id == role_id
    }

    pub fn is_joined(&self) -> bool {
        self.status == MembershipStatus::Joined
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "membershipId": self.membership_id.to_string(),
            "workspaceId": self.workspace_id.to_string(),
            "userId": self.user_id.to_string(),
            "status": self.status.as_str(),
            "roleId": self.role_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_membership_is_joined_with_owner_role() {
        let ws = WorkspaceId::new();
        let user = UserId::new();
        let membership = WorkspaceMembership::owner(ws, user);

        assert!(membership.belongs_to_workspace(ws));
        assert!(membership.is_user(user));
        assert!(membership.has_role(RoleId::OWNER));
        assert!(membership.is_joined());
    }

    #[test]
    fn member_membership_keeps_given_role() {
        let membership =
            WorkspaceMembership::member(WorkspaceId::new(), UserId::new(), RoleId::MEMBER);
        assert!(membership.has_role(RoleId::MEMBER));
        assert!(!membership.has_role(RoleId::OWNER));
        assert!(membership.is_joined());
    }

    #[test]
    fn membership_status_parse_roundtrip() {
        for status in [MembershipStatus::Invited, MembershipStatus::Joined] {
            let parsed: MembershipStatus = status.as_str().parse().unwrap();
            assert_eq!(status, parsed);
        }
        assert!("pending".parse::<MembershipStatus>().is_err());
    }

    #[test]
    fn to_json_shape() {
        let membership =
            WorkspaceMembership::member(WorkspaceId::new(), UserId::new(), RoleId::ADMIN);
        let json = membership.to_json();
        assert_eq!(json["membershipId"], membership.membership_id.to_string());
        assert_eq!(json["status"], "joined");
        assert_eq!(json["roleId"], "2");
    }
}
