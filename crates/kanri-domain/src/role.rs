//! Role types gating workspace and board management.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Numeric role identifier with singleton constants.
///
/// Memberships and invitations store this id; the named capability
/// predicates live on [`RoleName`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64")]
pub struct RoleId(i64);

impl RoleId {
    pub const OWNER: RoleId = RoleId(1);
    pub const ADMIN: RoleId = RoleId(2);
    pub const MEMBER: RoleId = RoleId(3);
    pub const GUEST: RoleId = RoleId(4);

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::NotPositive { field: "role id" });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RoleId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Named role within a workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Owner,  // Full control, can delete the workspace
    Admin,  // Manage members and boards
    Member, // Edit boards and cards
    Guest,  // Read-only access
}

impl std::str::FromStr for RoleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(RoleName::Owner),
            "admin" => Ok(RoleName::Admin),
            "member" => Ok(RoleName::Member),
            "guest" => Ok(RoleName::Guest),
            _ => Err(DomainError::UnknownValue {
                field: "role name",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "owner",
            RoleName::Admin => "admin",
            RoleName::Member => "member",
            RoleName::Guest => "guest",
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, RoleName::Owner)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, RoleName::Admin)
    }

    pub fn is_member(&self) -> bool {
        matches!(self, RoleName::Member)
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, RoleName::Guest)
    }

    /// Owners and admins can manage workspace settings, members and invites.
    pub fn can_manage_workspace(&self) -> bool {
        matches!(self, RoleName::Owner | RoleName::Admin)
    }

    /// Everyone but guests can edit boards.
    pub fn can_edit_board(&self) -> bool {
        matches!(self, RoleName::Owner | RoleName::Admin | RoleName::Member)
    }
}

/// Role record pairing the numeric id with its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Role {
    pub role_id: RoleId,
    pub name: RoleName,
}

impl Role {
    pub fn new(role_id: RoleId, name: RoleName) -> Self {
        Self { role_id, name }
    }

    pub fn is_owner(&self) -> bool {
        self.name.is_owner()
    }

    pub fn is_admin(&self) -> bool {
        self.name.is_admin()
    }

    pub fn is_member(&self) -> bool {
        self.name.is_member()
    }

    pub fn is_guest(&self) -> bool {
        self.name.is_guest()
    }

    pub fn can_manage_workspace(&self) -> bool {
        self.name.can_manage_workspace()
    }

    pub fn can_edit_board(&self) -> bool {
        self.name.can_edit_board()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "roleId": self.role_id.to_string(),
            "name": self.name.as_str(),
        })
    }
}
