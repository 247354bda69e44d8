//! Board service.

use std::sync::Arc;

use kanri_domain::{
    Board, BoardId, BoardMembership, BoardMembershipId, BoardName, MembershipId, RoleId, UserId,
    WorkspaceId,
};
use kanri_storage::{CreateBoardParams, CreatedBoard, Store, StoreError};

use crate::CoreError;

pub struct BoardService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> BoardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a board and enrol the given workspace memberships on it.
    ///
    /// The board and its board memberships land in one transaction; any
    /// membership id that does not exist aborts the whole operation.
    pub async fn create_board(
        &self,
        workspace_id: WorkspaceId,
        name: &str,
        membership_ids: &[MembershipId],
    ) -> Result<CreatedBoard, CoreError> {
        let board = Board::new(BoardId::new(), workspace_id, BoardName::new(name)?);
        let created = self
            .store
            .create_board(&CreateBoardParams {
                board,
                membership_ids: membership_ids.to_vec(),
            })
            .await?;

        tracing::info!(
            board_id = %created.board.board_id,
            workspace_id = %workspace_id,
            member_count = created.memberships.len(),
            "board created"
        );
        Ok(created)
    }

    pub async fn find_board_by_id(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<Board, CoreError> {
        Ok(self.store.get_board(workspace_id, board_id).await?)
    }

    pub async fn find_boards_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Board>, CoreError> {
        Ok(self.store.list_boards(workspace_id).await?)
    }

    /// Rename a board.
    pub async fn update_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
        name: &str,
    ) -> Result<Board, CoreError> {
        let board = self.store.get_board(workspace_id, board_id).await?;
        let renamed = board.renamed(BoardName::new(name)?);
        Ok(self.store.update_board(&renamed).await?)
    }

    pub async fn delete_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<(), CoreError> {
        self.store.delete_board(workspace_id, board_id).await?;
        tracing::info!(board_id = %board_id, "board deleted");
        Ok(())
    }

    pub async fn add_member_to_board(
        &self,
        board_id: BoardId,
        membership_id: MembershipId,
    ) -> Result<BoardMembership, CoreError> {
        let membership = BoardMembership::new(BoardMembershipId::new(), board_id, membership_id);
        Ok(self.store.add_board_member(&membership).await?)
    }

    pub async fn remove_member_from_board(
        &self,
        board_id: BoardId,
        board_membership_id: BoardMembershipId,
    ) -> Result<(), CoreError> {
        self.store
            .remove_board_member(board_id, board_membership_id)
            .await?;
        Ok(())
    }

    /// Whether `user_id` may manage boards in the workspace (owner or
    /// admin role). Non-members simply get `false`.
    pub async fn can_manage_board(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<bool, CoreError> {
        match self.store.find_membership(workspace_id, user_id).await {
            Ok(membership) => {
                Ok(membership.has_role(RoleId::OWNER) || membership.has_role(RoleId::ADMIN))
            }
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
