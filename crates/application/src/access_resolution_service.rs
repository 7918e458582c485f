use std::sync::Arc;

use hrgate_core::{AppError, AppResult};
use hrgate_domain::{
    Capability, InheritanceGraph, PermissionSet, Resource, Role, RoleClosure,
};
use tracing::{debug, warn};

use crate::access_ports::{
    CacheGeneration, PermissionRepository, ResolutionCache, RoleInheritanceRepository,
};

/// Read path of the engine: closures and effective permissions.
///
/// Cache failures degrade to recomputation from the stores; they never turn
/// into a grant or a denial on their own.
#[derive(Clone)]
pub struct AccessResolutionService {
    permission_repository: Arc<dyn PermissionRepository>,
    inheritance_repository: Arc<dyn RoleInheritanceRepository>,
    cache: Arc<dyn ResolutionCache>,
}

impl AccessResolutionService {
    /// Creates a new resolution service.
    #[must_use]
    pub fn new(
        permission_repository: Arc<dyn PermissionRepository>,
        inheritance_repository: Arc<dyn RoleInheritanceRepository>,
        cache: Arc<dyn ResolutionCache>,
    ) -> Self {
        Self {
            permission_repository,
            inheritance_repository,
            cache,
        }
    }

    /// Returns every role `role` inherits from, including itself.
    pub async fn resolve_closure(&self, role: Role) -> AppResult<RoleClosure> {
        if let Some(closure) = self.cached_closure(role).await {
            return Ok(closure);
        }

        let generation = self.current_generation().await;
        self.compute_closure(role, generation).await
    }

    /// Same as [`Self::resolve_closure`] for a transport role name.
    pub async fn resolve_closure_by_name(&self, role_name: &str) -> AppResult<RoleClosure> {
        self.resolve_closure(Role::from_transport(role_name)?).await
    }

    /// Merges the active rows of the role's closure for one resource.
    ///
    /// Returns the all-false set when no role in the closure has a row.
    pub async fn effective_permission(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<PermissionSet> {
        match self.cache.get_effective_permission(role, resource).await {
            Ok(Some(permission_set)) => return Ok(permission_set),
            Ok(None) => {}
            Err(error) => {
                warn!(%role, %resource, %error, "effective permission cache read failed");
            }
        }

        debug!(%role, %resource, "effective permission cache miss");
        let generation = self.current_generation().await;
        let closure = match self.cached_closure(role).await {
            Some(closure) => closure,
            None => self.compute_closure(role, generation).await?,
        };

        let permission_set = self
            .permission_repository
            .list_for_roles_and_resource(closure.roles(), resource)
            .await?
            .iter()
            .filter(|permission| closure.contains(permission.role()))
            .fold(PermissionSet::none(), |merged, permission| {
                merged | permission.effective_capabilities()
            });

        if let Some(generation) = generation
            && let Err(error) = self
                .cache
                .put_effective_permission(generation, role, resource, permission_set)
                .await
        {
            warn!(%role, %resource, %error, "effective permission cache write failed");
        }

        Ok(permission_set)
    }

    /// Same as [`Self::effective_permission`] for transport names.
    pub async fn effective_permission_by_name(
        &self,
        role_name: &str,
        resource_name: &str,
    ) -> AppResult<PermissionSet> {
        let role = Role::from_transport(role_name)?;
        let resource = Resource::from_transport(resource_name)?;
        self.effective_permission(role, resource).await
    }

    /// Returns whether the role may perform the capability on the resource.
    pub async fn has_capability(
        &self,
        role: Role,
        resource: Resource,
        capability: Capability,
    ) -> AppResult<bool> {
        Ok(self
            .effective_permission(role, resource)
            .await?
            .allows(capability))
    }

    /// Ensures the role may perform the capability on the resource.
    pub async fn require_capability(
        &self,
        role: Role,
        resource: Resource,
        capability: Capability,
    ) -> AppResult<()> {
        if self.has_capability(role, resource, capability).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "role '{role}' is missing '{capability}' on '{resource}'"
        )))
    }

    async fn cached_closure(&self, role: Role) -> Option<RoleClosure> {
        match self.cache.get_closure(role).await {
            Ok(closure) => closure,
            Err(error) => {
                warn!(%role, %error, "role closure cache read failed");
                None
            }
        }
    }

    async fn current_generation(&self) -> Option<CacheGeneration> {
        match self.cache.generation().await {
            Ok(generation) => Some(generation),
            Err(error) => {
                warn!(%error, "resolution cache generation unavailable, skipping population");
                None
            }
        }
    }

    async fn compute_closure(
        &self,
        role: Role,
        generation: Option<CacheGeneration>,
    ) -> AppResult<RoleClosure> {
        debug!(%role, "role closure cache miss");
        let edges = self.inheritance_repository.list_active_inheritance().await?;
        let closure = InheritanceGraph::from_active_edges(&edges).closure(role);

        if let Some(generation) = generation
            && let Err(error) = self.cache.put_closure(generation, closure.clone()).await
        {
            warn!(%role, %error, "role closure cache write failed");
        }

        Ok(closure)
    }
}
