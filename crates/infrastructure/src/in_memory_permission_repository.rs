use std::collections::HashMap;

use async_trait::async_trait;
use hrgate_application::PermissionRepository;
use hrgate_core::{AppError, AppResult};
use hrgate_domain::{Permission, PermissionId, Resource, Role};
use tokio::sync::RwLock;

/// In-memory permission matrix implementation.
#[derive(Debug, Default)]
pub struct InMemoryPermissionRepository {
    rows: RwLock<HashMap<PermissionId, Permission>>,
}

impl InMemoryPermissionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn insert_permission(&self, permission: Permission) -> AppResult<Permission> {
        let mut rows = self.rows.write().await;

        if rows.values().any(|stored| {
            stored.role() == permission.role() && stored.resource() == permission.resource()
        }) {
            return Err(AppError::Conflict(format!(
                "permission for role '{}' on resource '{}' already exists",
                permission.role(),
                permission.resource()
            )));
        }

        rows.insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<Permission> {
        let mut rows = self.rows.write().await;
        let Some(stored) = rows.get_mut(&permission.id()) else {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id()
            )));
        };

        *stored = permission.clone();
        Ok(permission)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("permission '{id}' was not found")))
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_role_resource(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|stored| stored.role() == role && stored.resource() == resource)
            .cloned())
    }

    async fn list_permissions(&self, role: Option<Role>) -> AppResult<Vec<Permission>> {
        let rows = self.rows.read().await;

        let mut values: Vec<Permission> = rows
            .values()
            .filter(|stored| role.is_none_or(|role| stored.role() == role))
            .cloned()
            .collect();
        values.sort_by_key(|stored| (stored.role(), stored.resource()));

        Ok(values)
    }

    async fn list_for_roles_and_resource(
        &self,
        roles: &[Role],
        resource: Resource,
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|stored| stored.resource() == resource && roles.contains(&stored.role()))
            .cloned()
            .collect())
    }
}
