//! kanri-core - domain services for the kanri project-management system.
//!
//! This crate orchestrates [`kanri_storage::Store`] calls around the domain
//! model: workspace lifecycle, membership management, the invitation flow,
//! boards with their member rosters, and cards with an append-only audit
//! trail.
//!
//! # Architecture
//!
//! Services are thin: they build or load domain entities, let the entities
//! enforce their own invariants, and hand the result to the store. The
//! cross-entity invariants (workspace + owner membership, invitation
//! acceptance + membership, board + board memberships) are carried by the
//! store's atomic compound operations, never stitched together here.

use thiserror::Error;

use kanri_domain::DomainError;
use kanri_storage::StoreError;

mod boards;
mod cards;
mod config;
mod invitations;
mod memberships;
mod queries;
mod workspaces;

pub use boards::BoardService;
pub use cards::CardService;
pub use config::CoreConfig;
pub use invitations::{InvitationForEmail, WorkspaceInvitationsService};
pub use memberships::{WorkspaceMember, WorkspaceMembershipsService};
pub use queries::{BoardMember, BoardQueries, BoardWithMembers, CardQueries, CardWithAssignee};
pub use workspaces::WorkspaceService;

#[cfg(test)]
mod tests;

/// Service-layer errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation or business-rule violation, passed through verbatim.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("configuration error: {0}")]
    Config(String),
}
