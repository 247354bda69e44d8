//! Workspace invitation types.
//!
//! An invitation is a time-bounded, single-use offer of membership sent to
//! an email address. Expiry is a computed predicate against wall-clock
//! time, not a stored state: an invitation loaded long after creation can
//! report a different expiry status without any write.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::email::EmailAddress;
use crate::error::DomainError;
use crate::ids::{InvitationId, UserId, WorkspaceId};
use crate::role::RoleId;

/// Invitation lifecycle state. `Accepted` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, InvitationStatus::Pending)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, InvitationStatus::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, InvitationStatus::Rejected)
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "rejected" => Ok(InvitationStatus::Rejected),
            _ => Err(DomainError::UnknownValue {
                field: "invitation status",
                value: s.to_string(),
            }),
        }
    }
}

/// Offer of workspace membership to an email address.
///
/// State machine: `pending --accept--> accepted` (only while not expired),
/// `pending --reject--> rejected`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceInvitation {
    invitation_id: InvitationId,
    workspace_id: WorkspaceId,
    invited_email: EmailAddress,
    invited_by: UserId,
    role_id: RoleId,
    status: InvitationStatus,
    expires_at: DateTime<Utc>,
}

impl WorkspaceInvitation {
    pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invitation_id: InvitationId,
        workspace_id: WorkspaceId,
        invited_email: EmailAddress,
        invited_by: UserId,
        role_id: RoleId,
        status: InvitationStatus,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            invitation_id,
            workspace_id,
            invited_email,
            invited_by,
            role_id,
            status,
            expires_at,
        }
    }

    /// Mint a pending invitation expiring `expires_in_days` from now.
    pub fn create(
        workspace_id: WorkspaceId,
        invited_email: EmailAddress,
        invited_by: UserId,
        role_id: RoleId,
        expires_in_days: i64,
    ) -> Self {
        Self::new(
            InvitationId::new(),
            workspace_id,
            invited_email,
            invited_by,
            role_id,
            InvitationStatus::Pending,
            Utc::now() + Duration::days(expires_in_days),
        )
    }

    pub fn invitation_id(&self) -> InvitationId {
        self.invitation_id
    }

    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    pub fn invited_email(&self) -> &EmailAddress {
        &self.invited_email
    }

    pub fn invited_by(&self) -> UserId {
        self.invited_by
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    pub fn is_rejected(&self) -> bool {
        self.status.is_rejected()
    }

    pub fn can_be_accepted(&self) -> bool {
        self.is_pending() && !self.is_expired()
    }

    /// Transition to `accepted`. Fails when not pending or already expired.
    pub fn accept(&self) -> Result<WorkspaceInvitation, DomainError> {
        if !self.can_be_accepted() {
            return Err(DomainError::InvitationNotAcceptable);
        }
        Ok(WorkspaceInvitation {
            status: InvitationStatus::Accepted,
            ..self.clone()
        })
    }

    /// Transition to `rejected`. Fails when not pending.
    pub fn reject(&self) -> Result<WorkspaceInvitation, DomainError> {
        if !self.is_pending() {
            return Err(DomainError::InvitationNotPending);
        }
        Ok(WorkspaceInvitation {
            status: InvitationStatus::Rejected,
            ..self.clone()
        })
    }

    pub fn belongs_to_workspace(&self, workspace_id: WorkspaceId) -> bool {
        self.workspace_id == workspace_id
    }

    pub fn is_for_email(&self, email: &EmailAddress) -> bool {
        self.invited_email == *email
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "invitationId": self.invitation_id.to_string(),
            "workspaceId": self.workspace_id.to_string(),
            "invitedEmail": self.invited_email.as_str(),
            "invitedBy": self.invited_by.to_string(),
            "roleId": self.role_id.to_string(),
            "status": self.status.as_str(),
            "expiresAt": self.expires_at.to_rfc3339(),
        })
    }
}
