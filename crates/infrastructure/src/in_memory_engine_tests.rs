//! Services wired to the in-memory adapters, as the API does for
//! `STORAGE_BACKEND=memory`.

use std::sync::Arc;

use hrgate_application::{
    AccessResolutionService, AdminWriteGate, CreatePermissionInput, CreateRoleInheritanceInput,
    PermissionMatrixService, ResolutionCache, RoleInheritanceService,
};
use hrgate_core::{AppError, CallerIdentity};
use hrgate_domain::{
    AuditAction, Capability, InheritancePriority, PermissionSet, Resource, Role,
    default_inheritance, default_permission_matrix,
};

use crate::{
    InMemoryAuditRepository, InMemoryPermissionRepository, InMemoryResolutionCache,
    InMemoryRoleInheritanceRepository, NoopResolutionCache,
};

struct Engine {
    audit: Arc<InMemoryAuditRepository>,
    resolution: AccessResolutionService,
    matrix: PermissionMatrixService,
    inheritance: RoleInheritanceService,
}

fn engine(cache: Arc<dyn ResolutionCache>) -> Engine {
    let permissions = Arc::new(InMemoryPermissionRepository::new());
    let edges = Arc::new(InMemoryRoleInheritanceRepository::new());
    let audit = Arc::new(InMemoryAuditRepository::new());
    let write_gate = AdminWriteGate::new();

    let resolution = AccessResolutionService::new(permissions.clone(), edges.clone(), cache.clone());
    let matrix = PermissionMatrixService::new(
        permissions,
        cache.clone(),
        audit.clone(),
        write_gate.clone(),
    );
    let inheritance =
        RoleInheritanceService::new(edges, resolution.clone(), cache, audit.clone(), write_gate);

    Engine {
        audit,
        resolution,
        matrix,
        inheritance,
    }
}

fn actor() -> CallerIdentity {
    CallerIdentity::new("ops@example.com", "admin")
}

async fn grant(engine: &Engine, role: Role, resource: Resource, capabilities: &[Capability]) {
    let created = engine
        .matrix
        .create_permission(
            &actor(),
            CreatePermissionInput {
                role,
                resource,
                capabilities: PermissionSet::from_capabilities(capabilities),
                description: String::new(),
                is_protected: false,
            },
        )
        .await;
    assert!(created.is_ok());
}

async fn inherit(engine: &Engine, child_role: Role, parent_role: Role) -> Result<(), AppError> {
    engine
        .inheritance
        .create_inheritance(
            &actor(),
            CreateRoleInheritanceInput {
                child_role,
                parent_role,
                priority: InheritancePriority::default(),
                notes: None,
            },
        )
        .await
        .map(|_| ())
}

async fn run_scenario(engine: &Engine) {
    assert!(inherit(engine, Role::Admin, Role::Hr).await.is_ok());
    assert!(inherit(engine, Role::Hr, Role::Employee).await.is_ok());
    grant(
        engine,
        Role::Employee,
        Resource::Messages,
        &[Capability::View, Capability::Create],
    )
    .await;
    grant(
        engine,
        Role::Hr,
        Resource::Employees,
        &[Capability::View, Capability::Edit],
    )
    .await;

    let closure = engine.resolution.resolve_closure(Role::Admin).await;
    assert_eq!(
        closure.map(|closure| closure.to_set()).ok(),
        Some([Role::Admin, Role::Hr, Role::Employee].into_iter().collect())
    );

    for _ in 0..2 {
        let messages = engine
            .resolution
            .effective_permission(Role::Admin, Resource::Messages)
            .await;
        assert!(messages.is_ok_and(|set| set.view && set.create && !set.delete));

        let employees = engine
            .resolution
            .effective_permission(Role::Admin, Resource::Employees)
            .await;
        assert!(employees.is_ok_and(|set| set.edit));

        let employee_self = engine
            .resolution
            .effective_permission(Role::Employee, Resource::Employees)
            .await;
        assert_eq!(employee_self.ok(), Some(PermissionSet::none()));
    }

    let cycle = inherit(engine, Role::Employee, Role::Admin).await;
    assert!(matches!(cycle, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn scenario_holds_with_in_memory_cache() {
    run_scenario(&engine(Arc::new(InMemoryResolutionCache::new()))).await;
}

#[tokio::test]
async fn scenario_holds_without_cache() {
    run_scenario(&engine(Arc::new(NoopResolutionCache::new()))).await;
}

#[tokio::test]
async fn seeded_defaults_drive_resolution() {
    let engine = engine(Arc::new(InMemoryResolutionCache::new()));

    let rows = engine.matrix.seed_defaults(&actor()).await;
    let edges = engine.inheritance.seed_defaults(&actor()).await;
    assert_eq!(rows.ok(), Some(default_permission_matrix().len()));
    assert_eq!(edges.ok(), Some(default_inheritance().len()));

    for resource in Resource::all() {
        let admin = engine
            .resolution
            .effective_permission(Role::Admin, *resource)
            .await;
        assert_eq!(admin.ok(), Some(PermissionSet::full()));
    }

    let manager = engine.resolution.resolve_closure(Role::GeneralManager).await;
    assert!(manager.is_ok_and(|closure| {
        closure.contains(Role::Manager)
            && closure.contains(Role::Supervisor)
            && closure.contains(Role::Employee)
    }));

    let listed = engine.matrix.list_permissions(None).await.unwrap_or_default();
    assert!(listed.iter().all(|permission| permission.is_protected()));

    let events = engine.audit.events().await;
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|event| event.action == AuditAction::DefaultsSeeded));
}
