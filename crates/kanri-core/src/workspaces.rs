//! Workspace lifecycle service.

use std::sync::Arc;

use kanri_domain::{UserId, Workspace, WorkspaceId, WorkspaceMembership, WorkspaceName};
use kanri_storage::{CreateWorkspaceParams, Store, StoreError};

use crate::CoreError;

pub struct WorkspaceService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> WorkspaceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a workspace owned by `owner_user_id`.
    ///
    /// The owner membership lands in the same transaction as the workspace
    /// row; on failure neither persists.
    pub async fn create_workspace(
        &self,
        name: &str,
        owner_user_id: UserId,
    ) -> Result<(Workspace, WorkspaceMembership), CoreError> {
        let workspace = Workspace::new(WorkspaceId::new(), WorkspaceName::new(name)?, owner_user_id);
        let owner_membership = WorkspaceMembership::owner(workspace.workspace_id, owner_user_id);

        let (workspace, membership) = self
            .store
            .create_workspace(&CreateWorkspaceParams {
                workspace,
                owner_membership,
            })
            .await?;

        tracing::info!(
            workspace_id = %workspace.workspace_id,
            owner_user_id = %owner_user_id,
            "workspace created"
        );
        Ok((workspace, membership))
    }

    pub async fn find_workspace_by_id(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Workspace, CoreError> {
        Ok(self.store.get_workspace(workspace_id).await?)
    }

    pub async fn list_workspaces_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Workspace>, CoreError> {
        Ok(self.store.list_workspaces_for_user(user_id).await?)
    }

    /// Rename a workspace.
    pub async fn update_workspace(
        &self,
        workspace_id: WorkspaceId,
        name: &str,
    ) -> Result<Workspace, CoreError> {
        let workspace = self.store.get_workspace(workspace_id).await?;
        let renamed = workspace.renamed(WorkspaceName::new(name)?);
        Ok(self.store.update_workspace(&renamed).await?)
    }

    /// Hand the workspace to another user. The new owner must already be a
    /// member.
    pub async fn transfer_ownership(
        &self,
        workspace_id: WorkspaceId,
        new_owner: UserId,
    ) -> Result<Workspace, CoreError> {
        let workspace = self.store.get_workspace(workspace_id).await?;
        match self.store.find_membership(workspace_id, new_owner).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => {
                return Err(CoreError::PermissionDenied(
                    "new owner is not a member of the workspace".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        }

        let updated = self
            .store
            .update_workspace(&workspace.with_owner(new_owner))
            .await?;
        tracing::info!(
            workspace_id = %workspace_id,
            new_owner = %new_owner,
            "workspace ownership transferred"
        );
        Ok(updated)
    }

    pub async fn delete_workspace(&self, workspace_id: WorkspaceId) -> Result<(), CoreError> {
        self.store.delete_workspace(workspace_id).await?;
        tracing::info!(workspace_id = %workspace_id, "workspace deleted");
        Ok(())
    }
}
