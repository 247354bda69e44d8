//! In-memory storage backend.
//!
//! This implementation is suitable for:
//! - Development and testing
//! - Single-process deployments that don't need durability
//!
//! All state lives behind a single mutex, so the compound operations
//! (`create_workspace`, `accept_invitation`, `create_board`,
//! `record_card_event`) are atomic: every referenced row is validated
//! before the first mutation, and a failed validation leaves the state
//! untouched. This is the same guarantee SQL backends get from their
//! transaction primitive.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use kanri_domain::{
    Board, BoardId, BoardMembership, BoardMembershipId, Card, CardActivity, CardHistory, CardId,
    EmailAddress, InvitationId, MembershipId, User, UserId, Workspace, WorkspaceId,
    WorkspaceInvitation, WorkspaceMembership,
};
use kanri_storage::{CreateBoardParams, CreateWorkspaceParams, CreatedBoard, Store, StoreError};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    workspaces: HashMap<WorkspaceId, Workspace>,
    memberships: HashMap<MembershipId, WorkspaceMembership>,
    invitations: HashMap<InvitationId, WorkspaceInvitation>,
    boards: HashMap<BoardId, Board>,
    board_memberships: HashMap<BoardMembershipId, BoardMembership>,
    cards: HashMap<CardId, (BoardId, Card)>,
    // Append-only; survives card and workspace deletion.
    history: Vec<CardHistory>,
    activity: Vec<CardActivity>,
}

impl State {
    fn membership_exists(&self, workspace_id: WorkspaceId, user_id: UserId) -> bool {
        self.memberships
            .values()
            .any(|m| m.belongs_to_workspace(workspace_id) && m.is_user(user_id))
    }
}

/// In-memory [`Store`] implementation.
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        if state.users.contains_key(&user.user_id) {
            return Err(StoreError::AlreadyExists);
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::AlreadyExists);
        }
        state.users.insert(user.user_id, user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, StoreError> {
        let state = self.lock()?;
        state.users.get(&user_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, StoreError> {
        let state = self.lock()?;
        state
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&user.user_id) {
            return Err(StoreError::NotFound);
        }
        state.users.insert(user.user_id, user.clone());
        Ok(user.clone())
    }

    // ───────────────────────────────────── Workspaces ─────────────────────────────────────

    async fn create_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<(Workspace, WorkspaceMembership), StoreError> {
        let workspace = &params.workspace;
        let membership = &params.owner_membership;

        let mut state = self.lock()?;
        if state.workspaces.contains_key(&workspace.workspace_id) {
            return Err(StoreError::AlreadyExists);
        }
        if state.memberships.contains_key(&membership.membership_id) {
            return Err(StoreError::Conflict);
        }
        if !membership.belongs_to_workspace(workspace.workspace_id) {
            return Err(StoreError::Conflict);
        }

        state
            .workspaces
            .insert(workspace.workspace_id, workspace.clone());
        state
            .memberships
            .insert(membership.membership_id, membership.clone());
        Ok((workspace.clone(), membership.clone()))
    }

    async fn get_workspace(&self, workspace_id: WorkspaceId) -> Result<Workspace, StoreError> {
        let state = self.lock()?;
        state
            .workspaces
            .get(&workspace_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_workspaces_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Workspace>, StoreError> {
        let state = self.lock()?;
        let mut workspaces: Vec<Workspace> = state
            .memberships
            .values()
            .filter(|m| m.is_user(user_id))
            .filter_map(|m| state.workspaces.get(&m.workspace_id).cloned())
            .collect();
        workspaces.sort_by_key(|w| w.workspace_id.0);
        Ok(workspaces)
    }

    async fn update_workspace(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
        let mut state = self.lock()?;
        if !state.workspaces.contains_key(&workspace.workspace_id) {
            return Err(StoreError::NotFound);
        }
        state
            .workspaces
            .insert(workspace.workspace_id, workspace.clone());
        Ok(workspace.clone())
    }

    async fn delete_workspace(&self, workspace_id: WorkspaceId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.workspaces.remove(&workspace_id).is_none() {
            return Err(StoreError::NotFound);
        }

        // Memberships, boards and cards go with the workspace. Invitations
        // are left behind; readers fall back to a placeholder workspace name.
        state
            .memberships
            .retain(|_, m| !m.belongs_to_workspace(workspace_id));

        let board_ids: Vec<BoardId> = state
            .boards
            .values()
            .filter(|b| b.belongs_to_workspace(workspace_id))
            .map(|b| b.board_id)
            .collect();
        state
            .boards
            .retain(|_, b| !b.belongs_to_workspace(workspace_id));
        state
            .board_memberships
            .retain(|_, bm| !board_ids.contains(&bm.board_id));
        state.cards.retain(|_, (board_id, _)| !board_ids.contains(board_id));

        Ok(())
    }

    // ───────────────────────────────────── Memberships ────────────────────────────────────

    async fn create_membership(
        &self,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError> {
        let mut state = self.lock()?;
        if state.memberships.contains_key(&membership.membership_id) {
            return Err(StoreError::AlreadyExists);
        }
        if !state.workspaces.contains_key(&membership.workspace_id) {
            return Err(StoreError::NotFound);
        }
        if state.membership_exists(membership.workspace_id, membership.user_id) {
            return Err(StoreError::Conflict);
        }
        state
            .memberships
            .insert(membership.membership_id, membership.clone());
        Ok(membership.clone())
    }

    async fn get_membership(
        &self,
        membership_id: MembershipId,
    ) -> Result<WorkspaceMembership, StoreError> {
        let state = self.lock()?;
        state
            .memberships
            .get(&membership_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<WorkspaceMembership, StoreError> {
        let state = self.lock()?;
        state
            .memberships
            .values()
            .find(|m| m.belongs_to_workspace(workspace_id) && m.is_user(user_id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_memberships(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceMembership>, StoreError> {
        let state = self.lock()?;
        let mut memberships: Vec<WorkspaceMembership> = state
            .memberships
            .values()
            .filter(|m| m.belongs_to_workspace(workspace_id))
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.membership_id.0);
        Ok(memberships)
    }

    async fn update_membership(
        &self,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError> {
        let mut state = self.lock()?;
        if !state.memberships.contains_key(&membership.membership_id) {
            return Err(StoreError::NotFound);
        }
        state
            .memberships
            .insert(membership.membership_id, membership.clone());
        Ok(membership.clone())
    }

    async fn delete_membership(&self, membership_id: MembershipId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.memberships.remove(&membership_id).is_none() {
            return Err(StoreError::NotFound);
        }
        // A removed member also leaves every board of the workspace.
        state
            .board_memberships
            .retain(|_, bm| !bm.is_member(membership_id));
        Ok(())
    }

    // ───────────────────────────────────── Invitations ────────────────────────────────────

    async fn create_invitation(
        &self,
        invitation: &WorkspaceInvitation,
    ) -> Result<WorkspaceInvitation, StoreError> {
        let mut state = self.lock()?;
        if state.invitations.contains_key(&invitation.invitation_id()) {
            return Err(StoreError::AlreadyExists);
        }
        if !state.workspaces.contains_key(&invitation.workspace_id()) {
            return Err(StoreError::NotFound);
        }
        state
            .invitations
            .insert(invitation.invitation_id(), invitation.clone());
        Ok(invitation.clone())
    }

    async fn get_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> Result<WorkspaceInvitation, StoreError> {
        let state = self.lock()?;
        state
            .invitations
            .get(&invitation_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_invitations_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<WorkspaceInvitation>, StoreError> {
        let state = self.lock()?;
        let mut invitations: Vec<WorkspaceInvitation> = state
            .invitations
            .values()
            .filter(|i| i.is_for_email(email))
            .cloned()
            .collect();
        invitations.sort_by_key(|i| i.invitation_id().0);
        Ok(invitations)
    }

    async fn list_invitations_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<WorkspaceInvitation>, StoreError> {
        let state = self.lock()?;
        let mut invitations: Vec<WorkspaceInvitation> = state
            .invitations
            .values()
            .filter(|i| i.belongs_to_workspace(workspace_id))
            .cloned()
            .collect();
        invitations.sort_by_key(|i| i.invitation_id().0);
        Ok(invitations)
    }

    async fn update_invitation(
        &self,
        invitation: &WorkspaceInvitation,
    ) -> Result<WorkspaceInvitation, StoreError> {
        let mut state = self.lock()?;
        if !state.invitations.contains_key(&invitation.invitation_id()) {
            return Err(StoreError::NotFound);
        }
        state
            .invitations
            .insert(invitation.invitation_id(), invitation.clone());
        Ok(invitation.clone())
    }

    async fn delete_invitation(&self, invitation_id: InvitationId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state
            .invitations
            .remove(&invitation_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn accept_invitation(
        &self,
        invitation: &WorkspaceInvitation,
        membership: &WorkspaceMembership,
    ) -> Result<WorkspaceMembership, StoreError> {
        let mut state = self.lock()?;
        if !state.invitations.contains_key(&invitation.invitation_id()) {
            return Err(StoreError::NotFound);
        }
        if state.memberships.contains_key(&membership.membership_id) {
            return Err(StoreError::Conflict);
        }
        if state.membership_exists(membership.workspace_id, membership.user_id) {
            return Err(StoreError::Conflict);
        }

        state
            .invitations
            .insert(invitation.invitation_id(), invitation.clone());
        state
            .memberships
            .insert(membership.membership_id, membership.clone());
        Ok(membership.clone())
    }

    // ───────────────────────────────────── Boards ─────────────────────────────────────────

    async fn create_board(&self, params: &CreateBoardParams) -> Result<CreatedBoard, StoreError> {
        let board = &params.board;

        let mut state = self.lock()?;
        if state.boards.contains_key(&board.board_id) {
            return Err(StoreError::AlreadyExists);
        }
        if !state.workspaces.contains_key(&board.workspace_id) {
            return Err(StoreError::NotFound);
        }
        // Validate every referenced membership before the first insert.
        for membership_id in &params.membership_ids {
            let membership = state
                .memberships
                .get(membership_id)
                .ok_or(StoreError::NotFound)?;
            if !membership.belongs_to_workspace(board.workspace_id) {
                return Err(StoreError::Conflict);
            }
        }

        state.boards.insert(board.board_id, board.clone());
        let mut memberships = Vec::with_capacity(params.membership_ids.len());
        for membership_id in &params.membership_ids {
            let bm = BoardMembership::new(BoardMembershipId::new(), board.board_id, *membership_id);
            state.board_memberships.insert(bm.board_membership_id, bm.clone());
            memberships.push(bm);
        }

        Ok(CreatedBoard {
            board: board.clone(),
            memberships,
        })
    }

    async fn get_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<Board, StoreError> {
        let state = self.lock()?;
        state
            .boards
            .get(&board_id)
            .filter(|b| b.belongs_to_workspace(workspace_id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_boards(&self, workspace_id: WorkspaceId) -> Result<Vec<Board>, StoreError> {
        let state = self.lock()?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|b| b.belongs_to_workspace(workspace_id))
            .cloned()
            .collect();
        boards.sort_by_key(|b| b.board_id.0);
        Ok(boards)
    }

    async fn update_board(&self, board: &Board) -> Result<Board, StoreError> {
        let mut state = self.lock()?;
        match state.boards.get(&board.board_id) {
            Some(existing) if existing.workspace_id == board.workspace_id => {}
            _ => return Err(StoreError::NotFound),
        }
        state.boards.insert(board.board_id, board.clone());
        Ok(board.clone())
    }

    async fn delete_board(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match state.boards.get(&board_id) {
            Some(board) if board.belongs_to_workspace(workspace_id) => {}
            _ => return Err(StoreError::NotFound),
        }
        state.boards.remove(&board_id);
        state
            .board_memberships
            .retain(|_, bm| !bm.belongs_to_board(board_id));
        state.cards.retain(|_, (b, _)| *b != board_id);
        Ok(())
    }

    // ───────────────────────────────────── Board memberships ──────────────────────────────

    async fn add_board_member(
        &self,
        membership: &BoardMembership,
    ) -> Result<BoardMembership, StoreError> {
        let mut state = self.lock()?;
        if state
            .board_memberships
            .contains_key(&membership.board_membership_id)
        {
            return Err(StoreError::AlreadyExists);
        }
        let board = state
            .boards
            .get(&membership.board_id)
            .ok_or(StoreError::NotFound)?;
        let workspace_membership = state
            .memberships
            .get(&membership.membership_id)
            .ok_or(StoreError::NotFound)?;
        if !workspace_membership.belongs_to_workspace(board.workspace_id) {
            return Err(StoreError::Conflict);
        }
        if state
            .board_memberships
            .values()
            .any(|bm| bm.belongs_to_board(membership.board_id) && bm.is_member(membership.membership_id))
        {
            return Err(StoreError::AlreadyExists);
        }
        state
            .board_memberships
            .insert(membership.board_membership_id, membership.clone());
        Ok(membership.clone())
    }

    async fn remove_board_member(
        &self,
        board_id: BoardId,
        board_membership_id: BoardMembershipId,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match state.board_memberships.get(&board_membership_id) {
            Some(bm) if bm.belongs_to_board(board_id) => {}
            _ => return Err(StoreError::NotFound),
        }
        state.board_memberships.remove(&board_membership_id);
        Ok(())
    }

    async fn list_board_members(
        &self,
        board_id: BoardId,
    ) -> Result<Vec<BoardMembership>, StoreError> {
        let state = self.lock()?;
        let mut members: Vec<BoardMembership> = state
            .board_memberships
            .values()
            .filter(|bm| bm.belongs_to_board(board_id))
            .cloned()
            .collect();
        members.sort_by_key(|bm| bm.board_membership_id.0);
        Ok(members)
    }

    // ───────────────────────────────────── Cards ──────────────────────────────────────────

    async fn create_card(&self, board_id: BoardId, card: &Card) -> Result<Card, StoreError> {
        let mut state = self.lock()?;
        if !state.boards.contains_key(&board_id) {
            return Err(StoreError::NotFound);
        }
        if state.cards.contains_key(&card.id()) {
            return Err(StoreError::AlreadyExists);
        }
        state.cards.insert(card.id(), (board_id, card.clone()));
        Ok(card.clone())
    }

    async fn get_card(&self, board_id: BoardId, card_id: CardId) -> Result<Card, StoreError> {
        let state = self.lock()?;
        match state.cards.get(&card_id) {
            Some((b, card)) if *b == board_id => Ok(card.clone()),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<Card>, StoreError> {
        let state = self.lock()?;
        let mut cards: Vec<Card> = state
            .cards
            .values()
            .filter(|(b, _)| *b == board_id)
            .map(|(_, card)| card.clone())
            .collect();
        cards.sort_by_key(|c| c.id().0);
        Ok(cards)
    }

    async fn update_card(&self, board_id: BoardId, card: &Card) -> Result<Card, StoreError> {
        let mut state = self.lock()?;
        match state.cards.get(&card.id()) {
            Some((b, _)) if *b == board_id => {}
            _ => return Err(StoreError::NotFound),
        }
        state.cards.insert(card.id(), (board_id, card.clone()));
        Ok(card.clone())
    }

    async fn delete_card(&self, board_id: BoardId, card_id: CardId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match state.cards.get(&card_id) {
            Some((b, _)) if *b == board_id => {}
            _ => return Err(StoreError::NotFound),
        }
        state.cards.remove(&card_id);
        Ok(())
    }

    // ───────────────────────────────────── Card history ───────────────────────────────────

    async fn record_card_event(
        &self,
        history: &CardHistory,
        activity: &CardActivity,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if activity.history_id != history.history_id || activity.card_id != history.card_id {
            return Err(StoreError::Conflict);
        }
        if state.history.iter().any(|h| {
            h.belongs_to_card(history.card_id) && h.version == history.version
        }) {
            return Err(StoreError::Conflict);
        }
        state.history.push(history.clone());
        state.activity.push(activity.clone());
        Ok(())
    }

    async fn list_card_history(&self, card_id: CardId) -> Result<Vec<CardHistory>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .history
            .iter()
            .filter(|h| h.belongs_to_card(card_id))
            .cloned()
            .collect())
    }

    async fn list_card_activity(
        &self,
        card_id: CardId,
    ) -> Result<Vec<CardActivity>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .activity
            .iter()
            .filter(|a| a.belongs_to_card(card_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kanri_domain::{
        BoardName, CardAction, CardDescription, CardStatus, CardTitle, CardVersion, DueDate,
        RoleId, UserName, WorkspaceName,
    };

    fn test_user(email: &str) -> User {
        let now = Utc::now();
        User::new(
            UserId::new(),
            UserName::new("Test User").unwrap(),
            EmailAddress::new(email).unwrap(),
            None,
            now,
            now,
            None,
        )
        .unwrap()
    }

    fn workspace_params(owner: UserId) -> CreateWorkspaceParams {
        let workspace = Workspace::new(
            WorkspaceId::new(),
            WorkspaceName::new("team").unwrap(),
            owner,
        );
        let owner_membership = WorkspaceMembership::owner(workspace.workspace_id, owner);
        CreateWorkspaceParams {
            workspace,
            owner_membership,
        }
    }

    fn test_card() -> Card {
        Card::new(
            CardId::new(),
            CardTitle::new("A card").unwrap(),
            CardDescription::empty(),
            CardStatus::Todo,
            DueDate::new(Utc::now() + Duration::days(7)),
            None,
        )
    }

    #[tokio::test]
    async fn create_workspace_creates_owner_membership() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();

        let (workspace, membership) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();

        assert!(membership.has_role(RoleId::OWNER));
        let found = store
            .find_membership(workspace.workspace_id, user.user_id)
            .await
            .unwrap();
        assert_eq!(found.membership_id, membership.membership_id);

        let listed = store.list_workspaces_for_user(user.user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn create_workspace_is_atomic_on_membership_conflict() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();

        // Seed a membership whose id collides with the owner membership.
        let (existing_ws, _) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();
        let colliding = store
            .find_membership(existing_ws.workspace_id, user.user_id)
            .await
            .unwrap();

        let workspace = Workspace::new(
            WorkspaceId::new(),
            WorkspaceName::new("second").unwrap(),
            user.user_id,
        );
        let owner_membership = WorkspaceMembership::new(
            colliding.membership_id, // duplicate id
            workspace.workspace_id,
            user.user_id,
            kanri_domain::MembershipStatus::Joined,
            RoleId::OWNER,
        );
        let params = CreateWorkspaceParams {
            workspace: workspace.clone(),
            owner_membership,
        };

        let err = store.create_workspace(&params).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // The workspace row must not have been persisted.
        let err = store.get_workspace(workspace.workspace_id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_user_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(&test_user("a@example.com")).await.unwrap();
        let err = store
            .create_user(&test_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn duplicate_workspace_membership_rejected() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, _) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();

        let duplicate =
            WorkspaceMembership::member(workspace.workspace_id, user.user_id, RoleId::MEMBER);
        let err = store.create_membership(&duplicate).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn accept_invitation_is_atomic() {
        let store = MemoryStore::new();
        let owner = store.create_user(&test_user("owner@example.com")).await.unwrap();
        let joiner = store.create_user(&test_user("joiner@example.com")).await.unwrap();
        let (workspace, _) = store
            .create_workspace(&workspace_params(owner.user_id))
            .await
            .unwrap();

        let invitation = WorkspaceInvitation::create(
            workspace.workspace_id,
            joiner.email.clone(),
            owner.user_id,
            RoleId::MEMBER,
            7,
        );
        store.create_invitation(&invitation).await.unwrap();

        // Joiner already has a membership: acceptance must change nothing.
        let preexisting =
            WorkspaceMembership::member(workspace.workspace_id, joiner.user_id, RoleId::GUEST);
        store.create_membership(&preexisting).await.unwrap();

        let accepted = invitation.accept().unwrap();
        let membership =
            WorkspaceMembership::member(workspace.workspace_id, joiner.user_id, RoleId::MEMBER);
        let err = store
            .accept_invitation(&accepted, &membership)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // Invitation row still pending.
        let stored = store.get_invitation(invitation.invitation_id()).await.unwrap();
        assert!(stored.is_pending());
    }

    #[tokio::test]
    async fn accept_invitation_updates_both_rows() {
        let store = MemoryStore::new();
        let owner = store.create_user(&test_user("owner@example.com")).await.unwrap();
        let joiner = store.create_user(&test_user("joiner@example.com")).await.unwrap();
        let (workspace, _) = store
            .create_workspace(&workspace_params(owner.user_id))
            .await
            .unwrap();

        let invitation = WorkspaceInvitation::create(
            workspace.workspace_id,
            joiner.email.clone(),
            owner.user_id,
            RoleId::MEMBER,
            7,
        );
        store.create_invitation(&invitation).await.unwrap();

        let accepted = invitation.accept().unwrap();
        let membership =
            WorkspaceMembership::member(workspace.workspace_id, joiner.user_id, RoleId::MEMBER);
        let created = store
            .accept_invitation(&accepted, &membership)
            .await
            .unwrap();
        assert!(created.has_role(RoleId::MEMBER));

        let stored = store.get_invitation(invitation.invitation_id()).await.unwrap();
        assert!(stored.is_accepted());
        assert!(store
            .find_membership(workspace.workspace_id, joiner.user_id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn create_board_aborts_on_unknown_membership() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, membership) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();

        let board = Board::new(
            BoardId::new(),
            workspace.workspace_id,
            BoardName::new("Sprint 1").unwrap(),
        );
        let params = CreateBoardParams {
            board: board.clone(),
            membership_ids: vec![membership.membership_id, MembershipId::new()],
        };

        let err = store.create_board(&params).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        // Nothing was created.
        assert!(store
            .list_boards(workspace.workspace_id)
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .list_board_members(board.board_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn create_board_enrols_members() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, membership) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();

        let board = Board::new(
            BoardId::new(),
            workspace.workspace_id,
            BoardName::new("Sprint 1").unwrap(),
        );
        let created = store
            .create_board(&CreateBoardParams {
                board,
                membership_ids: vec![membership.membership_id],
            })
            .await
            .unwrap();

        assert_eq!(created.memberships.len(), 1);
        let members = store.list_board_members(created.board.board_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].is_member(membership.membership_id));
    }

    #[tokio::test]
    async fn board_lookup_is_workspace_scoped() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, _) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();

        let board = Board::new(
            BoardId::new(),
            workspace.workspace_id,
            BoardName::new("Sprint 1").unwrap(),
        );
        let created = store
            .create_board(&CreateBoardParams {
                board,
                membership_ids: vec![],
            })
            .await
            .unwrap();

        assert!(store
            .get_board(workspace.workspace_id, created.board.board_id)
            .await
            .is_ok());
        let err = store
            .get_board(WorkspaceId::new(), created.board.board_id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn card_crud_and_scoping() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, _) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();
        let created = store
            .create_board(&CreateBoardParams {
                board: Board::new(
                    BoardId::new(),
                    workspace.workspace_id,
                    BoardName::new("Sprint 1").unwrap(),
                ),
                membership_ids: vec![],
            })
            .await
            .unwrap();
        let board_id = created.board.board_id;

        let card = test_card();
        store.create_card(board_id, &card).await.unwrap();

        let loaded = store.get_card(board_id, card.id()).await.unwrap();
        assert_eq!(loaded, card);

        // Wrong board: not found.
        assert!(store.get_card(BoardId::new(), card.id()).await.is_err());

        let started = card.start().unwrap();
        store.update_card(board_id, &started).await.unwrap();
        assert!(store
            .get_card(board_id, card.id())
            .await
            .unwrap()
            .status()
            .is_in_progress());

        store.delete_card(board_id, card.id()).await.unwrap();
        assert!(store.get_card(board_id, card.id()).await.is_err());
    }

    #[tokio::test]
    async fn delete_workspace_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user(&test_user("a@example.com")).await.unwrap();
        let (workspace, membership) = store
            .create_workspace(&workspace_params(user.user_id))
            .await
            .unwrap();
        let created = store
            .create_board(&CreateBoardParams {
                board: Board::new(
                    BoardId::new(),
                    workspace.workspace_id,
                    BoardName::new("Sprint 1").unwrap(),
                ),
                membership_ids: vec![membership.membership_id],
            })
            .await
            .unwrap();
        let card = test_card();
        store.create_card(created.board.board_id, &card).await.unwrap();

        store.delete_workspace(workspace.workspace_id).await.unwrap();

        assert!(store.get_workspace(workspace.workspace_id).await.is_err());
        assert!(store.get_membership(membership.membership_id).await.is_err());
        assert!(store
            .get_board(workspace.workspace_id, created.board.board_id)
            .await
            .is_err());
        assert!(store
            .get_card(created.board.board_id, card.id())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn record_card_event_appends_history_and_activity() {
        let store = MemoryStore::new();
        let card = test_card();
        let board_id = BoardId::new();
        let actor = MembershipId::new();

        let h1 = CardHistory::snapshot(&card, board_id, CardVersion::initial(), actor);
        let a1 = CardActivity::record(card.id(), h1.history_id, actor, CardAction::Create);
        store.record_card_event(&h1, &a1).await.unwrap();

        let started = card.start().unwrap();
        let h2 = CardHistory::snapshot(&started, board_id, CardVersion::initial().increment(), actor);
        let a2 = CardActivity::record(card.id(), h2.history_id, actor, CardAction::ChangeStatus);
        store.record_card_event(&h2, &a2).await.unwrap();

        let history = store.list_card_history(card.id()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[1].version.is_newer(history[0].version));

        let activity = store.list_card_activity(card.id()).await.unwrap();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].action, CardAction::Create);
        assert_eq!(activity[1].action, CardAction::ChangeStatus);
    }

    #[tokio::test]
    async fn record_card_event_rejects_duplicate_version() {
        let store = MemoryStore::new();
        let card = test_card();
        let board_id = BoardId::new();
        let actor = MembershipId::new();

        let h1 = CardHistory::snapshot(&card, board_id, CardVersion::initial(), actor);
        let a1 = CardActivity::record(card.id(), h1.history_id, actor, CardAction::Create);
        store.record_card_event(&h1, &a1).await.unwrap();

        let h_dup = CardHistory::snapshot(&card, board_id, CardVersion::initial(), actor);
        let a_dup = CardActivity::record(card.id(), h_dup.history_id, actor, CardAction::Create);
        let err = store.record_card_event(&h_dup, &a_dup).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // Activity list unchanged.
        assert_eq!(store.list_card_activity(card.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_card_event_rejects_mismatched_rows() {
        let store = MemoryStore::new();
        let card = test_card();
        let actor = MembershipId::new();

        let history = CardHistory::snapshot(&card, BoardId::new(), CardVersion::initial(), actor);
        // Activity pointing at a different snapshot.
        let activity =
            CardActivity::record(card.id(), kanri_domain::HistoryId::new(), actor, CardAction::Create);
        let err = store.record_card_event(&history, &activity).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }
}
