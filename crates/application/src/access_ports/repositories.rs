use async_trait::async_trait;

use hrgate_core::AppResult;
use hrgate_domain::{
    InheritanceId, Permission, PermissionId, Resource, Role, RoleInheritance,
};

/// Repository port for the permission matrix.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Inserts a new row.
    ///
    /// Fails with a conflict when a row for the same role and resource
    /// already exists, active or not.
    async fn insert_permission(&self, permission: Permission) -> AppResult<Permission>;

    /// Persists changes to an existing row.
    async fn save_permission(&self, permission: Permission) -> AppResult<Permission>;

    /// Hard-deletes a row.
    async fn delete_permission(&self, id: PermissionId) -> AppResult<()>;

    /// Finds a row by identifier.
    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>>;

    /// Finds the row for a role and resource.
    async fn find_by_role_resource(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<Permission>>;

    /// Lists rows ordered by role then resource, optionally for one role.
    async fn list_permissions(&self, role: Option<Role>) -> AppResult<Vec<Permission>>;

    /// Lists rows of any of the given roles for one resource.
    async fn list_for_roles_and_resource(
        &self,
        roles: &[Role],
        resource: Resource,
    ) -> AppResult<Vec<Permission>>;
}

/// Repository port for the role inheritance graph.
#[async_trait]
pub trait RoleInheritanceRepository: Send + Sync {
    /// Inserts a new edge.
    ///
    /// Fails with a conflict when an active edge for the same ordered pair
    /// already exists.
    async fn insert_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance>;

    /// Persists changes to an existing edge.
    async fn save_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance>;

    /// Hard-deletes an edge.
    async fn delete_inheritance(&self, id: InheritanceId) -> AppResult<()>;

    /// Finds an edge by identifier.
    async fn find_inheritance(&self, id: InheritanceId) -> AppResult<Option<RoleInheritance>>;

    /// Lists every edge ordered by child, parent and creation time.
    async fn list_inheritance(&self) -> AppResult<Vec<RoleInheritance>>;

    /// Lists active edges only.
    async fn list_active_inheritance(&self) -> AppResult<Vec<RoleInheritance>>;
}
