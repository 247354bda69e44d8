//! Card service.
//!
//! Every state-changing card operation appends a versioned snapshot and an
//! activity row after the write succeeds. Versions number the audit trail;
//! they are not used for optimistic locking.

use std::sync::Arc;

use kanri_domain::{
    BoardId, Card, CardAction, CardActivity, CardDescription, CardHistory, CardId, CardStatus,
    CardTitle, CardVersion, DueDate, MembershipId,
};
use kanri_storage::Store;

use crate::CoreError;

pub struct CardService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> CardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a card in `todo` status and record its initial snapshot.
    pub async fn create_card(
        &self,
        board_id: BoardId,
        title: &str,
        description: &str,
        due_date: DueDate,
        assignee_membership_id: Option<MembershipId>,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        if let Some(membership_id) = assignee_membership_id {
            self.store.get_membership(membership_id).await?;
        }

        let card = Card::new(
            CardId::new(),
            CardTitle::new(title)?,
            CardDescription::new(description)?,
            CardStatus::Todo,
            due_date,
            assignee_membership_id,
        );
        let card = self.store.create_card(board_id, &card).await?;
        self.record(board_id, &card, actor_membership_id, CardAction::Create)
            .await?;

        tracing::info!(card_id = %card.id(), board_id = %board_id, "card created");
        Ok(card)
    }

    pub async fn find_card_by_id(
        &self,
        board_id: BoardId,
        card_id: CardId,
    ) -> Result<Card, CoreError> {
        Ok(self.store.get_card(board_id, card_id).await?)
    }

    pub async fn find_cards_by_board(&self, board_id: BoardId) -> Result<Vec<Card>, CoreError> {
        Ok(self.store.list_cards(board_id).await?)
    }

    /// Persist an already-transformed card and record the action.
    pub async fn update_card(
        &self,
        board_id: BoardId,
        card: Card,
        actor_membership_id: MembershipId,
        action: CardAction,
    ) -> Result<Card, CoreError> {
        let card = self.store.update_card(board_id, &card).await?;
        self.record(board_id, &card, actor_membership_id, action)
            .await?;
        Ok(card)
    }

    pub async fn change_status(
        &self,
        board_id: BoardId,
        card_id: CardId,
        next: CardStatus,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let changed = card.change_status(next)?;
        self.update_card(board_id, changed, actor_membership_id, CardAction::ChangeStatus)
            .await
    }

    /// Move a completed card back into progress.
    pub async fn reopen(
        &self,
        board_id: BoardId,
        card_id: CardId,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let reopened = card.reopen()?;
        self.update_card(board_id, reopened, actor_membership_id, CardAction::Reopen)
            .await
    }

    pub async fn update_title(
        &self,
        board_id: BoardId,
        card_id: CardId,
        title: &str,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let updated = card.update_title(CardTitle::new(title)?);
        self.update_card(board_id, updated, actor_membership_id, CardAction::UpdateTitle)
            .await
    }

    pub async fn update_description(
        &self,
        board_id: BoardId,
        card_id: CardId,
        description: &str,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let updated = card.update_description(CardDescription::new(description)?);
        self.update_card(
            board_id,
            updated,
            actor_membership_id,
            CardAction::UpdateDescription,
        )
        .await
    }

    /// Assign the card to a workspace membership.
    pub async fn assign(
        &self,
        board_id: BoardId,
        card_id: CardId,
        membership_id: MembershipId,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        self.store.get_membership(membership_id).await?;
        let card = self.store.get_card(board_id, card_id).await?;
        let assigned = card.assign_to(membership_id);
        self.update_card(board_id, assigned, actor_membership_id, CardAction::Assign)
            .await
    }

    pub async fn unassign(
        &self,
        board_id: BoardId,
        card_id: CardId,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let unassigned = card.unassign();
        self.update_card(board_id, unassigned, actor_membership_id, CardAction::Unassign)
            .await
    }

    pub async fn change_due_date(
        &self,
        board_id: BoardId,
        card_id: CardId,
        due_date: DueDate,
        actor_membership_id: MembershipId,
    ) -> Result<Card, CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        let updated = card.change_due_date(due_date);
        self.update_card(
            board_id,
            updated,
            actor_membership_id,
            CardAction::ChangeDueDate,
        )
        .await
    }

    /// Delete a card, recording a final snapshot of its last state.
    pub async fn delete_card(
        &self,
        board_id: BoardId,
        card_id: CardId,
        actor_membership_id: MembershipId,
    ) -> Result<(), CoreError> {
        let card = self.store.get_card(board_id, card_id).await?;
        self.store.delete_card(board_id, card_id).await?;
        self.record(board_id, &card, actor_membership_id, CardAction::Delete)
            .await?;
        tracing::info!(card_id = %card_id, board_id = %board_id, "card deleted");
        Ok(())
    }

    pub async fn history(&self, card_id: CardId) -> Result<Vec<CardHistory>, CoreError> {
        Ok(self.store.list_card_history(card_id).await?)
    }

    pub async fn activity(&self, card_id: CardId) -> Result<Vec<CardActivity>, CoreError> {
        Ok(self.store.list_card_activity(card_id).await?)
    }

    /// Append a snapshot of `card` with the next version number.
    async fn record(
        &self,
        board_id: BoardId,
        card: &Card,
        actor_membership_id: MembershipId,
        action: CardAction,
    ) -> Result<(), CoreError> {
        let version = self.next_version(card.id()).await?;
        let history = CardHistory::snapshot(card, board_id, version, actor_membership_id);
        let activity =
            CardActivity::record(card.id(), history.history_id, actor_membership_id, action);
        self.store.record_card_event(&history, &activity).await?;
        Ok(())
    }

    async fn next_version(&self, card_id: CardId) -> Result<CardVersion, CoreError> {
        let history = self.store.list_card_history(card_id).await?;
        Ok(history
            .iter()
            .map(|h| h.version)
            .max()
            .map(|v| v.increment())
            .unwrap_or_else(CardVersion::initial))
    }
}
