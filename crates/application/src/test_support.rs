//! Fakes shared by the service test modules.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use hrgate_core::{AppError, AppResult, CallerIdentity};
use hrgate_domain::{
    InheritanceId, InheritancePriority, Permission, PermissionId, PermissionSet, Resource, Role,
    RoleClosure, RoleInheritance,
};

use crate::access_ports::{
    AuditEvent, AuditRepository, CacheGeneration, CreatePermissionInput,
    CreateRoleInheritanceInput, PermissionRepository, ResolutionCache, RoleInheritanceRepository,
};
use crate::{
    AccessResolutionService, AdminWriteGate, PermissionMatrixService, RoleInheritanceService,
};

#[derive(Default)]
pub struct FakePermissionRepository {
    pub rows: Mutex<Vec<Permission>>,
    pub resource_lookups: AtomicUsize,
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn insert_permission(&self, permission: Permission) -> AppResult<Permission> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|row| {
            row.role() == permission.role() && row.resource() == permission.resource()
        }) {
            return Err(AppError::Conflict("duplicate pair".to_owned()));
        }
        rows.push(permission.clone());
        Ok(permission)
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<Permission> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == permission.id())
            .ok_or_else(|| AppError::NotFound("permission".to_owned()))?;
        *row = permission.clone();
        Ok(permission)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(AppError::NotFound("permission".to_owned()));
        }
        Ok(())
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned())
    }

    async fn find_by_role_resource(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.role() == role && row.resource() == resource)
            .cloned())
    }

    async fn list_permissions(&self, role: Option<Role>) -> AppResult<Vec<Permission>> {
        let mut rows: Vec<Permission> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| role.is_none_or(|role| row.role() == role))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.role(), row.resource()));
        Ok(rows)
    }

    async fn list_for_roles_and_resource(
        &self,
        roles: &[Role],
        resource: Resource,
    ) -> AppResult<Vec<Permission>> {
        self.resource_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| row.resource() == resource && roles.contains(&row.role()))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeRoleInheritanceRepository {
    pub edges: Mutex<Vec<RoleInheritance>>,
    pub active_listings: AtomicUsize,
}

#[async_trait]
impl RoleInheritanceRepository for FakeRoleInheritanceRepository {
    async fn insert_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        self.edges.lock().await.push(edge.clone());
        Ok(edge)
    }

    async fn save_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        let mut edges = self.edges.lock().await;
        let stored = edges
            .iter_mut()
            .find(|stored| stored.id() == edge.id())
            .ok_or_else(|| AppError::NotFound("edge".to_owned()))?;
        *stored = edge.clone();
        Ok(edge)
    }

    async fn delete_inheritance(&self, id: InheritanceId) -> AppResult<()> {
        let mut edges = self.edges.lock().await;
        let before = edges.len();
        edges.retain(|edge| edge.id() != id);
        if edges.len() == before {
            return Err(AppError::NotFound("edge".to_owned()));
        }
        Ok(())
    }

    async fn find_inheritance(&self, id: InheritanceId) -> AppResult<Option<RoleInheritance>> {
        Ok(self
            .edges
            .lock()
            .await
            .iter()
            .find(|edge| edge.id() == id)
            .cloned())
    }

    async fn list_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        Ok(self.edges.lock().await.clone())
    }

    async fn list_active_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        self.active_listings.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .edges
            .lock()
            .await
            .iter()
            .filter(|edge| edge.is_active())
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct CacheState {
    generation: CacheGeneration,
    closures: HashMap<Role, RoleClosure>,
    effective: HashMap<(Role, Resource), PermissionSet>,
}

#[derive(Default)]
pub struct FakeResolutionCache {
    state: Mutex<CacheState>,
    pub fail_reads: AtomicBool,
}

impl FakeResolutionCache {
    pub async fn cached_effective(&self, role: Role, resource: Resource) -> Option<PermissionSet> {
        self.state
            .lock()
            .await
            .effective
            .get(&(role, resource))
            .copied()
    }

    fn read_guard(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("cache offline".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResolutionCache for FakeResolutionCache {
    async fn generation(&self) -> AppResult<CacheGeneration> {
        Ok(self.state.lock().await.generation)
    }

    async fn get_closure(&self, role: Role) -> AppResult<Option<RoleClosure>> {
        self.read_guard()?;
        Ok(self.state.lock().await.closures.get(&role).cloned())
    }

    async fn put_closure(&self, generation: CacheGeneration, closure: RoleClosure) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.closures.insert(closure.root(), closure);
        }
        Ok(())
    }

    async fn get_effective_permission(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<PermissionSet>> {
        self.read_guard()?;
        Ok(self.cached_effective(role, resource).await)
    }

    async fn put_effective_permission(
        &self,
        generation: CacheGeneration,
        role: Role,
        resource: Resource,
        permission_set: PermissionSet,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.effective.insert((role, resource), permission_set);
        }
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<CacheGeneration> {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.closures.clear();
        state.effective.clear();
        Ok(state.generation)
    }
}

#[derive(Default)]
pub struct FakeAuditRepository {
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

pub struct TestEngine {
    pub permissions: Arc<FakePermissionRepository>,
    pub edges: Arc<FakeRoleInheritanceRepository>,
    pub cache: Arc<FakeResolutionCache>,
    pub audit: Arc<FakeAuditRepository>,
    pub resolution: AccessResolutionService,
    pub matrix: PermissionMatrixService,
    pub inheritance: RoleInheritanceService,
}

impl TestEngine {
    pub fn new() -> Self {
        let permissions = Arc::new(FakePermissionRepository::default());
        let edges = Arc::new(FakeRoleInheritanceRepository::default());
        let cache = Arc::new(FakeResolutionCache::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let write_gate = AdminWriteGate::new();

        let resolution =
            AccessResolutionService::new(permissions.clone(), edges.clone(), cache.clone());
        let matrix = PermissionMatrixService::new(
            permissions.clone(),
            cache.clone(),
            audit.clone(),
            write_gate.clone(),
        );
        let inheritance = RoleInheritanceService::new(
            edges.clone(),
            resolution.clone(),
            cache.clone(),
            audit.clone(),
            write_gate,
        );

        Self {
            permissions,
            edges,
            cache,
            audit,
            resolution,
            matrix,
            inheritance,
        }
    }

    pub async fn inherit(&self, child_role: Role, parent_role: Role) -> AppResult<RoleInheritance> {
        self.inheritance
            .create_inheritance(
                &admin(),
                CreateRoleInheritanceInput {
                    child_role,
                    parent_role,
                    priority: InheritancePriority::default(),
                    notes: None,
                },
            )
            .await
    }

    pub async fn grant(
        &self,
        role: Role,
        resource: Resource,
        capabilities: PermissionSet,
    ) -> AppResult<Permission> {
        self.matrix
            .create_permission(
                &admin(),
                CreatePermissionInput {
                    role,
                    resource,
                    capabilities,
                    description: String::new(),
                    is_protected: false,
                },
            )
            .await
    }
}

pub fn admin() -> CallerIdentity {
    CallerIdentity::new("admin-1", "admin")
}
