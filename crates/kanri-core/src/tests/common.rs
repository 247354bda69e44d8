//! Common test helpers for service tests.

use std::sync::Arc;

use chrono::Utc;
use kanri_domain::{
    EmailAddress, User, UserId, UserName, Workspace, WorkspaceMembership,
};
use kanri_storage::Store;
use kanri_store_memory::MemoryStore;

use crate::WorkspaceService;

pub fn test_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Create and persist a user.
pub async fn create_test_user(store: &Arc<MemoryStore>, email: &str) -> User {
    let now = Utc::now();
    let user = User::new(
        UserId::new(),
        UserName::new("Test User").unwrap(),
        EmailAddress::new(email).unwrap(),
        None,
        now,
        now,
        None,
    )
    .unwrap();
    store.create_user(&user).await.unwrap()
}

/// Create a workspace through the service, returning it with the owner
/// membership.
pub async fn create_test_workspace(
    store: &Arc<MemoryStore>,
    owner: UserId,
    name: &str,
) -> (Workspace, WorkspaceMembership) {
    WorkspaceService::new(store.clone())
        .create_workspace(name, owner)
        .await
        .unwrap()
}
