//! Workspace invitation service.
//!
//! Creating an invitation requires a managing role in the workspace.
//! Acceptance transitions the invitation and creates the membership in one
//! atomic store operation; a failure of either half leaves no partial
//! state behind.

use std::sync::Arc;

use kanri_domain::{
    EmailAddress, InvitationId, RoleId, UserId, WorkspaceId, WorkspaceInvitation,
    WorkspaceMembership,
};
use kanri_storage::{Store, StoreError};

use crate::{CoreConfig, CoreError};

/// Read model: an invitation with the name of the workspace it opens.
#[derive(Clone, Debug)]
pub struct InvitationForEmail {
    pub invitation: WorkspaceInvitation,
    pub workspace_name: String,
}

pub struct WorkspaceInvitationsService<S: Store> {
    store: Arc<S>,
    config: CoreConfig,
}

impl<S: Store> WorkspaceInvitationsService<S> {
    pub fn new(store: Arc<S>, config: CoreConfig) -> Self {
        Self { store, config }
    }

    /// Invite `invited_email` to the workspace with the given role.
    ///
    /// `invited_by` must hold a membership with a managing role (owner or
    /// admin) in the workspace.
    pub async fn create_invitation(
        &self,
        workspace_id: WorkspaceId,
        invited_email: EmailAddress,
        invited_by: UserId,
        role_id: RoleId,
    ) -> Result<WorkspaceInvitation, CoreError> {
        let inviter = match self.store.find_membership(workspace_id, invited_by).await {
            Ok(membership) => membership,
            Err(StoreError::NotFound) => {
                return Err(CoreError::PermissionDenied(
                    "inviter is not a member of the workspace".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        if !inviter.has_role(RoleId::OWNER) && !inviter.has_role(RoleId::ADMIN) {
            return Err(CoreError::PermissionDenied(
                "managing role required to invite members".to_string(),
            ));
        }

        let invitation = WorkspaceInvitation::create(
            workspace_id,
            invited_email,
            invited_by,
            role_id,
            self.config.invitation_expiry_days,
        );
        let invitation = self.store.create_invitation(&invitation).await?;

        tracing::info!(
            invitation_id = %invitation.invitation_id(),
            workspace_id = %workspace_id,
            invited_email = %invitation.invited_email(),
            "invitation created"
        );
        Ok(invitation)
    }

    /// All invitations addressed to `email`, each with its workspace name.
    /// A deleted workspace shows up as "Unknown Workspace".
    pub async fn invitations_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<InvitationForEmail>, CoreError> {
        let invitations = self.store.list_invitations_by_email(email).await?;
        let mut result = Vec::with_capacity(invitations.len());
        for invitation in invitations {
            let workspace_name = match self.store.get_workspace(invitation.workspace_id()).await {
                Ok(workspace) => workspace.name.as_str().to_string(),
                Err(_) => "Unknown Workspace".to_string(),
            };
            result.push(InvitationForEmail {
                invitation,
                workspace_name,
            });
        }
        Ok(result)
    }

    pub async fn pending_invitations_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<WorkspaceInvitation>, CoreError> {
        let invitations = self.store.list_invitations_by_email(email).await?;
        Ok(invitations.into_iter().filter(|i| i.is_pending()).collect())
    }

    pub async fn invitations_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceInvitation>, CoreError> {
        Ok(self.store.list_invitations_by_workspace(workspace_id).await?)
    }

    /// Accept an invitation as `user_id`.
    ///
    /// The domain entity gates the transition (pending and unexpired); the
    /// store persists the accepted invitation and the new membership
    /// atomically. The created membership carries the invited role.
    pub async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        user_id: UserId,
    ) -> Result<WorkspaceMembership, CoreError> {
        let invitation = self.store.get_invitation(invitation_id).await?;
        let accepted = invitation.accept()?;

        let membership = WorkspaceMembership::member(
            invitation.workspace_id(),
            user_id,
            invitation.role_id(),
        );
        let membership = self.store.accept_invitation(&accepted, &membership).await?;

        tracing::info!(
            invitation_id = %invitation_id,
            workspace_id = %membership.workspace_id,
            user_id = %user_id,
            "invitation accepted"
        );
        Ok(membership)
    }

    pub async fn reject_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> Result<WorkspaceInvitation, CoreError> {
        let invitation = self.store.get_invitation(invitation_id).await?;
        let rejected = invitation.reject()?;
        let rejected = self.store.update_invitation(&rejected).await?;
        tracing::info!(invitation_id = %invitation_id, "invitation rejected");
        Ok(rejected)
    }

    pub async fn delete_invitation(&self, invitation_id: InvitationId) -> Result<(), CoreError> {
        self.store.delete_invitation(invitation_id).await?;
        Ok(())
    }
}
