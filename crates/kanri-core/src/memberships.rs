//! Workspace membership service.

use std::sync::Arc;

use kanri_domain::{MembershipId, RoleId, User, UserId, WorkspaceId, WorkspaceMembership};
use kanri_storage::{Store, StoreError};

use crate::CoreError;

/// A membership joined with the user behind it.
#[derive(Clone, Debug)]
pub struct WorkspaceMember {
    pub membership: WorkspaceMembership,
    pub user: User,
}

pub struct WorkspaceMembershipsService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> WorkspaceMembershipsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn add_member_to_workspace(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<WorkspaceMembership, CoreError> {
        let membership = self
            .store
            .create_membership(&WorkspaceMembership::member(workspace_id, user_id, role_id))
            .await?;
        tracing::info!(
            workspace_id = %workspace_id,
            user_id = %user_id,
            role_id = %role_id,
            "member added to workspace"
        );
        Ok(membership)
    }

    pub async fn members_of_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, CoreError> {
        let memberships = self.store.list_memberships(workspace_id).await?;
        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let user = self.store.get_user(membership.user_id).await?;
            members.push(WorkspaceMember { membership, user });
        }
        Ok(members)
    }

    pub async fn member_of(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<Option<WorkspaceMember>, CoreError> {
        let membership = match self.store.find_membership(workspace_id, user_id).await {
            Ok(membership) => membership,
            Err(StoreError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let user = self.store.get_user(user_id).await?;
        Ok(Some(WorkspaceMember { membership, user }))
    }

    pub async fn update_member_role(
        &self,
        membership_id: MembershipId,
        role_id: RoleId,
    ) -> Result<WorkspaceMembership, CoreError> {
        let membership = self.store.get_membership(membership_id).await?;
        let updated = WorkspaceMembership {
            role_id,
            ..membership
        };
        Ok(self.store.update_membership(&updated).await?)
    }

    pub async fn remove_member(&self, membership_id: MembershipId) -> Result<(), CoreError> {
        self.store.delete_membership(membership_id).await?;
        tracing::info!(membership_id = %membership_id, "member removed from workspace");
        Ok(())
    }
}
