//! Storage abstraction for kanri.
//!
//! Backend crates (e.g., kanri-store-memory) implement the [`Store`] trait
//! so `kanri-core` doesn't depend on any specific database engine or schema
//! details. The trait speaks domain entities on both sides; row mapping is
//! a backend concern.

use thiserror::Error;

use kanri_domain::{Board, BoardMembership, MembershipId, Workspace, WorkspaceMembership};

mod store;

pub use store::Store;

#[cfg(feature = "test-support")]
pub use store::MockStore;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Parameters for creating a workspace together with its owner membership.
///
/// Backends persist both rows in one transaction: a workspace must never
/// exist without an owner membership.
#[derive(Clone, Debug)]
pub struct CreateWorkspaceParams {
    pub workspace: Workspace,
    pub owner_membership: WorkspaceMembership,
}

/// Parameters for creating a board together with its initial members.
///
/// Backends persist the board and one board membership per entry of
/// `membership_ids` in one transaction; an unknown membership id aborts
/// the whole operation.
#[derive(Clone, Debug)]
pub struct CreateBoardParams {
    pub board: Board,
    pub membership_ids: Vec<MembershipId>,
}

/// A board together with the board memberships created alongside it.
#[derive(Clone, Debug)]
pub struct CreatedBoard {
    pub board: Board,
    pub memberships: Vec<BoardMembership>,
}
