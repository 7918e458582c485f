use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use hrgate_application::PermissionRepository;
use hrgate_core::{AppError, AppResult};
use hrgate_domain::{
    Permission, PermissionFlags, PermissionId, PermissionSet, RecordTimestamps, Resource, Role,
};

/// PostgreSQL-backed permission matrix.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    role: String,
    resource: String,
    capabilities: Json<PermissionSet>,
    description: String,
    is_active: bool,
    is_protected: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(row.role.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid stored permission row '{}': {error}", row.id))
        })?;
        let resource = Resource::from_str(row.resource.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid stored permission row '{}': {error}", row.id))
        })?;

        Ok(Permission::from_stored(
            PermissionId::from_uuid(row.id),
            role,
            resource,
            row.capabilities.0,
            row.description,
            PermissionFlags {
                is_active: row.is_active,
                is_protected: row.is_protected,
            },
            RecordTimestamps {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        ))
    }
}

const SELECT_PERMISSIONS: &str = r#"
    SELECT
        id,
        role,
        resource,
        capabilities,
        description,
        is_active,
        is_protected,
        created_at,
        updated_at
    FROM permissions
"#;

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn insert_permission(&self, permission: Permission) -> AppResult<Permission> {
        let timestamps = permission.timestamps();

        sqlx::query(
            r#"
            INSERT INTO permissions (
                id,
                role,
                resource,
                capabilities,
                description,
                is_active,
                is_protected,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.role().as_str())
        .bind(permission.resource().as_str())
        .bind(Json(permission.capabilities()))
        .bind(permission.description())
        .bind(permission.is_active())
        .bind(permission.is_protected())
        .bind(timestamps.created_at)
        .bind(timestamps.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_permission_conflict(error, &permission))?;

        Ok(permission)
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<Permission> {
        let result = sqlx::query(
            r#"
            UPDATE permissions
            SET capabilities = $2,
                description = $3,
                is_active = $4,
                is_protected = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(Json(permission.capabilities()))
        .bind(permission.description())
        .bind(permission.is_active())
        .bind(permission.is_protected())
        .bind(permission.timestamps().updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update permission: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id()
            )));
        }

        Ok(permission)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete permission: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("permission '{id}' was not found")));
        }

        Ok(())
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!("{SELECT_PERMISSIONS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        row.map(Permission::try_from).transpose()
    }

    async fn find_by_role_resource(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "{SELECT_PERMISSIONS} WHERE role = $1 AND resource = $2"
        ))
        .bind(role.as_str())
        .bind(resource.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find permission for role '{role}' on resource '{resource}': {error}"
            ))
        })?;

        row.map(Permission::try_from).transpose()
    }

    async fn list_permissions(&self, role: Option<Role>) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(&format!(
            "{SELECT_PERMISSIONS} WHERE ($1::TEXT IS NULL OR role = $1)"
        ))
        .bind(role.map(|role| role.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        let mut permissions = rows
            .into_iter()
            .map(Permission::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        // Catalog order is not lexical, so sort on the domain side.
        permissions.sort_by_key(|permission| (permission.role(), permission.resource()));

        Ok(permissions)
    }

    async fn list_for_roles_and_resource(
        &self,
        roles: &[Role],
        resource: Resource,
    ) -> AppResult<Vec<Permission>> {
        let role_names: Vec<&str> = roles.iter().map(Role::as_str).collect();

        let rows = sqlx::query_as::<_, PermissionRow>(&format!(
            "{SELECT_PERMISSIONS} WHERE resource = $1 AND role = ANY($2)"
        ))
        .bind(resource.as_str())
        .bind(role_names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list permissions on resource '{resource}': {error}"
            ))
        })?;

        rows.into_iter().map(Permission::try_from).collect()
    }
}

fn map_permission_conflict(error: sqlx::Error, permission: &Permission) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "permission for role '{}' on resource '{}' already exists",
            permission.role(),
            permission.resource()
        ));
    }

    AppError::Internal(format!("failed to create permission: {error}"))
}
