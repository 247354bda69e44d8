//! Workspace service tests.

use std::sync::Arc;

use kanri_domain::{DomainError, RoleId, UserId};
use kanri_storage::{MockStore, Store, StoreError};

use super::common::*;
use crate::{CoreError, WorkspaceService};

#[tokio::test]
async fn create_workspace_creates_owner_membership() {
    let store = test_store();
    let user = create_test_user(&store, "owner@example.com").await;
    let service = WorkspaceService::new(store.clone());

    let (workspace, membership) = service
        .create_workspace("My Workspace", user.user_id)
        .await
        .unwrap();

    assert_eq!(workspace.name.as_str(), "My Workspace");
    assert!(workspace.is_owned_by(user.user_id));
    assert!(membership.has_role(RoleId::OWNER));
    assert!(membership.belongs_to_workspace(workspace.workspace_id));

    // The membership is queryable immediately.
    let found = store
        .find_membership(workspace.workspace_id, user.user_id)
        .await
        .unwrap();
    assert_eq!(found.membership_id, membership.membership_id);
}

#[tokio::test]
async fn create_workspace_validates_name() {
    let store = test_store();
    let user = create_test_user(&store, "owner@example.com").await;
    let service = WorkspaceService::new(store.clone());

    let err = service.create_workspace("   ", user.user_id).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Domain(DomainError::Empty { .. })
    ));

    let err = service
        .create_workspace(&"x".repeat(101), user.user_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Domain(DomainError::TooLong { .. })
    ));
}

#[tokio::test]
async fn update_workspace_renames() {
    let store = test_store();
    let user = create_test_user(&store, "owner@example.com").await;
    let (workspace, _) = create_test_workspace(&store, user.user_id, "before").await;
    let service = WorkspaceService::new(store.clone());

    let updated = service
        .update_workspace(workspace.workspace_id, "after")
        .await
        .unwrap();
    assert_eq!(updated.name.as_str(), "after");

    let reloaded = service
        .find_workspace_by_id(workspace.workspace_id)
        .await
        .unwrap();
    assert_eq!(reloaded.name.as_str(), "after");
}

#[tokio::test]
async fn transfer_ownership_requires_membership() {
    let store = test_store();
    let owner = create_test_user(&store, "owner@example.com").await;
    let outsider = create_test_user(&store, "outsider@example.com").await;
    let (workspace, _) = create_test_workspace(&store, owner.user_id, "team").await;
    let service = WorkspaceService::new(store.clone());

    let err = service
        .transfer_ownership(workspace.workspace_id, outsider.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    // Still owned by the original owner.
    let reloaded = service
        .find_workspace_by_id(workspace.workspace_id)
        .await
        .unwrap();
    assert!(reloaded.is_owned_by(owner.user_id));
}

#[tokio::test]
async fn list_workspaces_for_user() {
    let store = test_store();
    let user = create_test_user(&store, "owner@example.com").await;
    let other = create_test_user(&store, "other@example.com").await;
    create_test_workspace(&store, user.user_id, "first").await;
    create_test_workspace(&store, user.user_id, "second").await;
    create_test_workspace(&store, other.user_id, "not mine").await;

    let service = WorkspaceService::new(store.clone());
    let workspaces = service.list_workspaces_for_user(user.user_id).await.unwrap();
    assert_eq!(workspaces.len(), 2);
}

#[tokio::test]
async fn delete_workspace_removes_memberships() {
    let store = test_store();
    let user = create_test_user(&store, "owner@example.com").await;
    let (workspace, membership) = create_test_workspace(&store, user.user_id, "team").await;
    let service = WorkspaceService::new(store.clone());

    service.delete_workspace(workspace.workspace_id).await.unwrap();

    assert!(matches!(
        service.find_workspace_by_id(workspace.workspace_id).await,
        Err(CoreError::Storage(StoreError::NotFound))
    ));
    assert!(store.get_membership(membership.membership_id).await.is_err());
}

#[tokio::test]
async fn storage_failure_surfaces_as_storage_error() {
    let mut mock = MockStore::new();
    mock.expect_create_workspace()
        .returning(|_| Err(StoreError::Backend("db down".to_string())));
    let service = WorkspaceService::new(Arc::new(mock));

    let err = service
        .create_workspace("team", UserId::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Storage(StoreError::Backend(_))
    ));
}
