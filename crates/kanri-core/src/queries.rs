//! Read models joining boards and cards with their people.

use std::sync::Arc;

use kanri_domain::{Board, BoardId, Card, MembershipId, User, WorkspaceId};
use kanri_storage::{Store, StoreError};

use crate::{CoreConfig, CoreError};

/// A board member: the user plus the workspace membership linking them.
#[derive(Clone, Debug)]
pub struct BoardMember {
    pub user: User,
    pub membership_id: MembershipId,
}

/// A board with its resolved member roster.
#[derive(Clone, Debug)]
pub struct BoardWithMembers {
    pub board: Board,
    pub members: Vec<BoardMember>,
}

/// A card with its resolved assignee, if any.
#[derive(Clone, Debug)]
pub struct CardWithAssignee {
    pub card: Card,
    pub assignee: Option<User>,
}

pub struct BoardQueries<S: Store> {
    store: Arc<S>,
}

impl<S: Store> BoardQueries<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn board_with_members(
        &self,
        workspace_id: WorkspaceId,
        board_id: BoardId,
    ) -> Result<BoardWithMembers, CoreError> {
        let board = self.store.get_board(workspace_id, board_id).await?;

        let board_memberships = self.store.list_board_members(board_id).await?;
        let mut members = Vec::with_capacity(board_memberships.len());
        for board_membership in board_memberships {
            let membership = self
                .store
                .get_membership(board_membership.membership_id)
                .await?;
            let user = self.store.get_user(membership.user_id).await?;
            members.push(BoardMember {
                user,
                membership_id: membership.membership_id,
            });
        }

        Ok(BoardWithMembers { board, members })
    }
}

pub struct CardQueries<S: Store> {
    store: Arc<S>,
    config: CoreConfig,
}

impl<S: Store> CardQueries<S> {
    pub fn new(store: Arc<S>, config: CoreConfig) -> Self {
        Self { store, config }
    }

    /// All cards on a board with their assignees resolved. A dangling
    /// assignee membership resolves to `None`, like an outer join.
    pub async fn cards_with_assignees(
        &self,
        board_id: BoardId,
    ) -> Result<Vec<CardWithAssignee>, CoreError> {
        let cards = self.store.list_cards(board_id).await?;
        let mut result = Vec::with_capacity(cards.len());
        for card in cards {
            let assignee = match card.assignee_membership_id() {
                Some(membership_id) => self.resolve_assignee(membership_id).await?,
                None => None,
            };
            result.push(CardWithAssignee { card, assignee });
        }
        Ok(result)
    }

    /// Cards that are due within the configured window and not done.
    pub async fn cards_due_soon(&self, board_id: BoardId) -> Result<Vec<Card>, CoreError> {
        let cards = self.store.list_cards(board_id).await?;
        Ok(cards
            .into_iter()
            .filter(|c| !c.status().is_done() && c.due_date().is_soon(self.config.due_soon_days))
            .collect())
    }

    async fn resolve_assignee(
        &self,
        membership_id: MembershipId,
    ) -> Result<Option<User>, CoreError> {
        let membership = match self.store.get_membership(membership_id).await {
            Ok(membership) => membership,
            Err(StoreError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match self.store.get_user(membership.user_id).await {
            Ok(user) => Ok(Some(user)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
