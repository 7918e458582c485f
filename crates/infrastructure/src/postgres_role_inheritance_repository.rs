use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use hrgate_application::RoleInheritanceRepository;
use hrgate_core::{AppError, AppResult};
use hrgate_domain::{InheritanceId, InheritancePriority, RecordTimestamps, Role, RoleInheritance};

/// PostgreSQL-backed role inheritance graph.
#[derive(Clone)]
pub struct PostgresRoleInheritanceRepository {
    pool: PgPool,
}

impl PostgresRoleInheritanceRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleInheritanceRow {
    id: uuid::Uuid,
    child_role: String,
    parent_role: String,
    priority: i16,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleInheritanceRow> for RoleInheritance {
    type Error = AppError;

    fn try_from(row: RoleInheritanceRow) -> Result<Self, Self::Error> {
        let corrupt = |error: AppError| {
            AppError::Internal(format!("invalid stored role inheritance '{}': {error}", row.id))
        };

        let child_role = Role::from_str(row.child_role.as_str()).map_err(corrupt)?;
        let parent_role = Role::from_str(row.parent_role.as_str()).map_err(corrupt)?;
        let priority = u8::try_from(row.priority)
            .map_err(|error| AppError::Validation(error.to_string()))
            .and_then(InheritancePriority::new)
            .map_err(corrupt)?;

        Ok(RoleInheritance::from_stored(
            InheritanceId::from_uuid(row.id),
            child_role,
            parent_role,
            priority,
            row.is_active,
            row.notes,
            RecordTimestamps {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        ))
    }
}

const SELECT_INHERITANCE: &str = r#"
    SELECT
        id,
        child_role,
        parent_role,
        priority,
        is_active,
        notes,
        created_at,
        updated_at
    FROM role_inheritance
"#;

#[async_trait]
impl RoleInheritanceRepository for PostgresRoleInheritanceRepository {
    async fn insert_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        let timestamps = edge.timestamps();

        sqlx::query(
            r#"
            INSERT INTO role_inheritance (
                id,
                child_role,
                parent_role,
                priority,
                is_active,
                notes,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(edge.id().as_uuid())
        .bind(edge.child_role().as_str())
        .bind(edge.parent_role().as_str())
        .bind(i16::from(edge.priority().value()))
        .bind(edge.is_active())
        .bind(edge.notes())
        .bind(timestamps.created_at)
        .bind(timestamps.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_active_pair_conflict(error, &edge, "create"))?;

        Ok(edge)
    }

    async fn save_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        let result = sqlx::query(
            r#"
            UPDATE role_inheritance
            SET priority = $2,
                is_active = $3,
                notes = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(edge.id().as_uuid())
        .bind(i16::from(edge.priority().value()))
        .bind(edge.is_active())
        .bind(edge.notes())
        .bind(edge.timestamps().updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_active_pair_conflict(error, &edge, "update"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role inheritance '{}' was not found",
                edge.id()
            )));
        }

        Ok(edge)
    }

    async fn delete_inheritance(&self, id: InheritanceId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM role_inheritance WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role inheritance: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role inheritance '{id}' was not found"
            )));
        }

        Ok(())
    }

    async fn find_inheritance(&self, id: InheritanceId) -> AppResult<Option<RoleInheritance>> {
        let row = sqlx::query_as::<_, RoleInheritanceRow>(&format!(
            "{SELECT_INHERITANCE} WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role inheritance: {error}")))?;

        row.map(RoleInheritance::try_from).transpose()
    }

    async fn list_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        self.list_where("TRUE").await
    }

    async fn list_active_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        self.list_where("is_active").await
    }
}

impl PostgresRoleInheritanceRepository {
    async fn list_where(&self, predicate: &'static str) -> AppResult<Vec<RoleInheritance>> {
        let rows = sqlx::query_as::<_, RoleInheritanceRow>(&format!(
            "{SELECT_INHERITANCE} WHERE {predicate}"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role inheritance: {error}")))?;

        let mut edges = rows
            .into_iter()
            .map(RoleInheritance::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        edges.sort_by_key(|edge| {
            (
                edge.child_role(),
                edge.parent_role(),
                edge.timestamps().created_at,
            )
        });

        Ok(edges)
    }
}

fn map_active_pair_conflict(
    error: sqlx::Error,
    edge: &RoleInheritance,
    operation: &str,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "role '{}' already inherits from '{}'",
            edge.child_role(),
            edge.parent_role()
        ));
    }

    AppError::Internal(format!("failed to {operation} role inheritance: {error}"))
}

#[cfg(test)]
mod tests;
