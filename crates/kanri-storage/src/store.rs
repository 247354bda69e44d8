//! The Store trait that backends implement.

use kanri_domain::{
    Board, BoardId, BoardMembership, BoardMembershipId, Card, CardActivity, CardHistory, CardId,
    EmailAddress, InvitationId, MembershipId, User, UserId, Workspace, WorkspaceId,
    WorkspaceInvitation, WorkspaceMembership,
};

use crate::{CreateBoardParams, CreateWorkspaceParams, CreatedBoard, StoreError};

/// The storage trait `kanri-core` depends on.
///
/// Boards and cards are **scoped by their parent** (workspace resp. board):
/// lookups fail with `NotFound` when the child exists under a different
/// parent. Compound operations are atomic; on error nothing is persisted.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Create a new user.
    async fn create_user(&self, user: &User) -> Result<User, StoreError>;

    /// Get user by ID.
    async fn get_user(&self, user_id: UserId) -> Result<User, StoreError>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, StoreError>;

    /// Update a user (name, image, soft-delete marker).
    async fn update_user(&self, user: &User) -> Result<User, StoreError>;

    // ───────────────────────────────────── Workspaces ─────────────────────────────────────

    /// Atomically create a workspace and its owner membership.
    async fn create_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<(Workspace, WorkspaceMembership), StoreError>;

    /// Get workspace by ID.
    async fn get_workspace(&self, workspace_id: WorkspaceId) -> Result<Workspace, StoreError>;

    /// List all workspaces a user is a member of.
    async fn list_workspaces_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Workspace>, StoreError>;

    /// Update a workspace (name, ownership).
    async fn update_workspace(&self, workspace: &Workspace) -> Result<Workspace, StoreError>;

    /// Delete a workspace, cascading to its memberships, invitations,
    /// boards, board memberships and cards.
    async fn delete_workspace(&self, workspace_id: WorkspaceId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Memberships ────────────────────────────────────

    /// Create a workspace membership.
    async fn create_membership(
        &self,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError>;

    /// Get membership by ID.
    async fn get_membership(
        &self,
        membership_id: MembershipId,
    ) -> Result<WorkspaceMembership, StoreError>;

    /// Find the membership linking a user to a workspace.
    async fn find_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<WorkspaceMembership, StoreError>;

    /// List all memberships of a workspace.
    async fn list_memberships(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceMembership>, StoreError>;

    /// Update a membership (role, status).
    async fn update_membership(
        &self,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError>;

    /// Delete a membership.
    async fn delete_membership(&self, membership_id: MembershipId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Invitations ────────────────────────────────────

    /// Create an invitation.
    async fn create_invitation(
        &self,
        invitation: &WorkspaceInvitation,
    ) -> Result<WorkspaceInvitation, StoreError>;

    /// Get invitation by ID.
    async fn get_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> Result<WorkspaceInvitation, StoreError>;

    /// List all invitations addressed to an email.
    async fn list_invitations_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<WorkspaceInvitation>, StoreError>;

    /// List all invitations of a workspace.
    async fn list_invitations_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceInvitation>, StoreError>;

    /// Update an invitation (status transition).
    async fn update_invitation(
        &self,
        invitation: &WorkspaceInvitation,
    ) -> Result<WorkspaceInvitation, StoreError>;

    /// Delete an invitation.
    async fn delete_invitation(&self, invitation_id: InvitationId) -> Result<(), StoreError>;

    /// Atomically persist an accepted invitation and the membership it
    /// produced. Either both rows land or neither does.
    async fn accept_invitation(
        &self,
        invitation: &WorkspaceInvitation,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError>;

    // ───────────────────────────────────── Boards ─────────────────────────────────────────

    /// Atomically create a board and enrol the given workspace memberships.
    async fn create_board(&self, params: &CreateBoardParams) -> Result<CreatedBoard, StoreError>;

    /// Get a board by ID within a workspace.
    async fn get_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<Board, StoreError>;

    /// List all boards in a workspace.
    async fn list_boards(&self, workspace_id: WorkspaceId) -> Result<Vec<Board>, StoreError>;

    /// Update a board (name).
    async fn update_board(&self, board: &Board) -> Result<Board, StoreError>;

    /// Delete a board and its board memberships and cards.
    async fn delete_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<(), StoreError>;

    // ───────────────────────────────────── Board memberships ──────────────────────────────

    /// Add a workspace membership to a board.
    async fn add_board_member(
        &self,
        membership: &BoardMembership,
    ) -> Result<BoardMembership, StoreError>;

    /// Remove a member from a board.
    async fn remove_board_member(
        &self,
        board_id: BoardId,
        board_membership_id: BoardMembershipId,
    ) -> Result<(), StoreError>;

    /// List all board memberships of a board.
    async fn list_board_members(
        &self,
        board_id: BoardId,
    ) -> Result<Vec<BoardMembership>, StoreError>;

    // ───────────────────────────────────── Cards ──────────────────────────────────────────

    /// Create a card on a board.
    async fn create_card(&self, board_id: BoardId, card: &Card) -> Result<Card, StoreError>;

    /// Get a card by ID within a board.
    async fn get_card(&self, board_id: BoardId, card_id: CardId) -> Result<Card, StoreError>;

    /// List all cards on a board.
    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<Card>, StoreError>;

    /// Update a card on a board.
    async fn update_card(&self, board_id: BoardId, card: &Card) -> Result<Card, StoreError>;

    /// Delete a card.
    async fn delete_card(&self, board_id: BoardId, card_id: CardId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Card history ───────────────────────────────────

    /// Atomically append a card snapshot and the activity that produced it.
    async fn record_card_event(
        &self,
        history: &CardHistory,
        activity: &CardActivity,
    ) -> Result<(), StoreError>;

    /// List all snapshots of a card, oldest first.
    async fn list_card_history(&self, card_id: CardId) -> Result<Vec<CardHistory>, StoreError>;

    /// List all recorded activities of a card, oldest first.
    async fn list_card_activity(&self, card_id: CardId)
        -> Result<Vec<CardActivity>, StoreError>;
}
