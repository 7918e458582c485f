use hrgate_core::AppError;
use hrgate_domain::{
    AuditAction, Capability, PermissionId, PermissionSet, Resource, Role,
    default_permission_matrix,
};

use crate::access_ports::{CreatePermissionInput, UpdatePermissionInput};
use crate::test_support::{TestEngine, admin};

#[tokio::test]
async fn second_row_for_same_pair_is_a_conflict() {
    let engine = TestEngine::new();
    assert!(
        engine
            .grant(Role::Hr, Resource::Employees, PermissionSet::full())
            .await
            .is_ok()
    );

    let duplicate = engine
        .grant(Role::Hr, Resource::Employees, PermissionSet::none())
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn inactive_row_still_blocks_duplicate_creation() {
    let engine = TestEngine::new();
    let Ok(permission) = engine
        .grant(Role::Payroll, Resource::Payroll, PermissionSet::full())
        .await
    else {
        panic!("permission should be created");
    };
    let deactivated = engine
        .matrix
        .update_permission(
            &admin(),
            permission.id(),
            UpdatePermissionInput {
                is_active: Some(false),
                ..UpdatePermissionInput::default()
            },
        )
        .await;
    assert!(deactivated.is_ok());

    let duplicate = engine
        .grant(Role::Payroll, Resource::Payroll, PermissionSet::full())
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let engine = TestEngine::new();
    let created = engine
        .matrix
        .create_permission(
            &admin(),
            CreatePermissionInput {
                role: Role::Manager,
                resource: Resource::LeaveRequests,
                capabilities: PermissionSet::from_capabilities(&[Capability::View]),
                description: "managers read leave".to_owned(),
                is_protected: false,
            },
        )
        .await;
    let Ok(created) = created else {
        panic!("permission should be created");
    };

    let updated = engine
        .matrix
        .update_permission(
            &admin(),
            created.id(),
            UpdatePermissionInput {
                capabilities: Some(PermissionSet::from_capabilities(&[
                    Capability::View,
                    Capability::Approve,
                ])),
                ..UpdatePermissionInput::default()
            },
        )
        .await;
    let Ok(updated) = updated else {
        panic!("permission should be updated");
    };

    assert_eq!(updated.description(), "managers read leave");
    assert!(updated.capabilities().approve);
    assert!(updated.is_active());
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let engine = TestEngine::new();
    let Ok(created) = engine
        .grant(Role::Hr, Resource::Employees, PermissionSet::full())
        .await
    else {
        panic!("permission should be created");
    };

    let result = engine
        .matrix
        .update_permission(&admin(), created.id(), UpdatePermissionInput::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn empty_update_of_unknown_row_is_not_found() {
    let engine = TestEngine::new();
    let result = engine
        .matrix
        .update_permission(&admin(), PermissionId::new(), UpdatePermissionInput::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let engine = TestEngine::new();

    let update = engine
        .matrix
        .update_permission(
            &admin(),
            PermissionId::new(),
            UpdatePermissionInput {
                is_active: Some(true),
                ..UpdatePermissionInput::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));

    let delete = engine
        .matrix
        .delete_permission(&admin(), PermissionId::new())
        .await;
    assert!(matches!(delete, Err(AppError::NotFound(_))));

    let get = engine.matrix.get_permission(PermissionId::new()).await;
    assert!(matches!(get, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn protected_row_cannot_be_deleted_until_unprotected() {
    let engine = TestEngine::new();
    let created = engine
        .matrix
        .create_permission(
            &admin(),
            CreatePermissionInput {
                role: Role::Admin,
                resource: Resource::Permissions,
                capabilities: PermissionSet::full(),
                description: "admins manage access".to_owned(),
                is_protected: true,
            },
        )
        .await;
    let Ok(created) = created else {
        panic!("permission should be created");
    };

    let blocked = engine.matrix.delete_permission(&admin(), created.id()).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let unprotected = engine
        .matrix
        .update_permission(
            &admin(),
            created.id(),
            UpdatePermissionInput {
                is_protected: Some(false),
                ..UpdatePermissionInput::default()
            },
        )
        .await;
    assert!(unprotected.is_ok());

    let deleted = engine.matrix.delete_permission(&admin(), created.id()).await;
    assert!(deleted.is_ok());
}

#[tokio::test]
async fn every_write_refreshes_cached_decisions() {
    let engine = TestEngine::new();
    let resolve = || async {
        engine
            .resolution
            .effective_permission(Role::Supervisor, Resource::Attendance)
            .await
            .unwrap_or(PermissionSet::full())
    };

    assert!(resolve().await.is_empty());

    let Ok(permission) = engine
        .grant(
            Role::Supervisor,
            Resource::Attendance,
            PermissionSet::from_capabilities(&[Capability::View]),
        )
        .await
    else {
        panic!("permission should be created");
    };
    assert!(resolve().await.view);

    let updated = engine
        .matrix
        .update_permission(
            &admin(),
            permission.id(),
            UpdatePermissionInput {
                capabilities: Some(PermissionSet::from_capabilities(&[Capability::Edit])),
                ..UpdatePermissionInput::default()
            },
        )
        .await;
    assert!(updated.is_ok());
    let after_update = resolve().await;
    assert!(after_update.edit && !after_update.view);

    let deleted = engine
        .matrix
        .delete_permission(&admin(), permission.id())
        .await;
    assert!(deleted.is_ok());
    assert!(resolve().await.is_empty());
}

#[tokio::test]
async fn list_by_role_only_returns_that_role() {
    let engine = TestEngine::new();
    for (role, resource) in [
        (Role::Hr, Resource::Employees),
        (Role::Hr, Resource::Documents),
        (Role::Payroll, Resource::Payroll),
    ] {
        assert!(engine.grant(role, resource, PermissionSet::full()).await.is_ok());
    }

    let rows = engine.matrix.list_by_role(Role::Hr).await.unwrap_or_default();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.role() == Role::Hr));
    assert_eq!(rows[0].resource(), Resource::Employees);

    let all = engine.matrix.list_permissions(None).await.unwrap_or_default();
    assert_eq!(all.len(), 3);

    let found = engine
        .matrix
        .find_by_role_resource(Role::Payroll, Resource::Payroll)
        .await;
    assert!(found.is_ok_and(|row| row.is_some()));
}

#[tokio::test]
async fn writes_are_audited() {
    let engine = TestEngine::new();
    let Ok(permission) = engine
        .grant(Role::Employee, Resource::Messages, PermissionSet::full())
        .await
    else {
        panic!("permission should be created");
    };
    assert!(
        engine
            .matrix
            .delete_permission(&admin(), permission.id())
            .await
            .is_ok()
    );

    let events = engine.audit.events.lock().await;
    let actions: Vec<AuditAction> = events.iter().map(|event| event.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::PermissionCreated, AuditAction::PermissionDeleted]
    );
    assert!(events.iter().all(|event| event.subject == "admin-1"));
}

#[tokio::test]
async fn seeding_is_idempotent_and_protects_rows() {
    let engine = TestEngine::new();

    let first = engine.matrix.seed_defaults(&admin()).await;
    assert_eq!(first.ok(), Some(default_permission_matrix().len()));

    let second = engine.matrix.seed_defaults(&admin()).await;
    assert_eq!(second.ok(), Some(0));

    let rows = engine.matrix.list_permissions(None).await.unwrap_or_default();
    assert!(rows.iter().all(|row| row.is_protected()));
}
