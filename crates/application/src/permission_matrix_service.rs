use std::sync::Arc;

use hrgate_core::{AppError, AppResult, CallerIdentity};
use hrgate_domain::{
    AuditAction, Permission, PermissionId, Resource, Role, default_permission_matrix,
};
use tracing::{debug, info};

use crate::AdminWriteGate;
use crate::access_ports::{
    AuditEvent, AuditRepository, CreatePermissionInput, PermissionRepository, ResolutionCache,
    UpdatePermissionInput,
};

const AUDIT_RESOURCE_TYPE: &str = "access_permission";

/// Administrative service for the permission matrix.
#[derive(Clone)]
pub struct PermissionMatrixService {
    repository: Arc<dyn PermissionRepository>,
    cache: Arc<dyn ResolutionCache>,
    audit_repository: Arc<dyn AuditRepository>,
    write_gate: AdminWriteGate,
}

impl PermissionMatrixService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionRepository>,
        cache: Arc<dyn ResolutionCache>,
        audit_repository: Arc<dyn AuditRepository>,
        write_gate: AdminWriteGate,
    ) -> Self {
        Self {
            repository,
            cache,
            audit_repository,
            write_gate,
        }
    }

    /// Lists every row, or only the rows of one role.
    pub async fn list_permissions(&self, role: Option<Role>) -> AppResult<Vec<Permission>> {
        self.repository.list_permissions(role).await
    }

    /// Lists the rows of one role.
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<Permission>> {
        self.repository.list_permissions(Some(role)).await
    }

    /// Returns one row by identifier.
    pub async fn get_permission(&self, id: PermissionId) -> AppResult<Permission> {
        self.repository
            .find_permission(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission '{id}' was not found")))
    }

    /// Returns the row for a role and resource, if any.
    pub async fn find_by_role_resource(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<Permission>> {
        self.repository.find_by_role_resource(role, resource).await
    }

    /// Creates a row and invalidates the resolution cache.
    pub async fn create_permission(
        &self,
        actor: &CallerIdentity,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        let permission = Permission::new(
            input.role,
            input.resource,
            input.capabilities,
            input.description,
        )?
        .protected(input.is_protected);

        let _guard = self.write_gate.enter().await;

        if self
            .repository
            .find_by_role_resource(input.role, input.resource)
            .await?
            .is_some()
        {
            return Err(duplicate_pair(input.role, input.resource));
        }

        let permission = self.repository.insert_permission(permission).await?;
        self.invalidate_cache().await?;

        info!(
            role = %permission.role(),
            resource = %permission.resource(),
            id = %permission.id(),
            "permission created"
        );
        self.append_audit(
            actor,
            AuditAction::PermissionCreated,
            &permission,
            format!(
                "created permission '{}:{}' granting [{}]",
                permission.role(),
                permission.resource(),
                describe(&permission)
            ),
        )
        .await?;

        Ok(permission)
    }

    /// Applies a partial update and invalidates the resolution cache.
    pub async fn update_permission(
        &self,
        actor: &CallerIdentity,
        id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let _guard = self.write_gate.enter().await;

        let mut permission = self.get_permission(id).await?;
        if input.is_empty() {
            return Err(AppError::Validation(
                "permission update must change at least one field".to_owned(),
            ));
        }
        if let Some(description) = input.description {
            permission.set_description(description)?;
        }
        if let Some(capabilities) = input.capabilities {
            permission.set_capabilities(capabilities);
        }
        if let Some(is_active) = input.is_active {
            permission.set_active(is_active);
        }
        if let Some(is_protected) = input.is_protected {
            permission.set_protected(is_protected);
        }

        let permission = self.repository.save_permission(permission).await?;
        self.invalidate_cache().await?;

        info!(
            role = %permission.role(),
            resource = %permission.resource(),
            id = %permission.id(),
            "permission updated"
        );
        self.append_audit(
            actor,
            AuditAction::PermissionUpdated,
            &permission,
            format!(
                "updated permission '{}:{}' (active={}, protected={}, grants=[{}])",
                permission.role(),
                permission.resource(),
                permission.is_active(),
                permission.is_protected(),
                describe(&permission)
            ),
        )
        .await?;

        Ok(permission)
    }

    /// Deletes a row and invalidates the resolution cache.
    ///
    /// Protected rows must be unprotected first.
    pub async fn delete_permission(
        &self,
        actor: &CallerIdentity,
        id: PermissionId,
    ) -> AppResult<()> {
        let _guard = self.write_gate.enter().await;

        let permission = self.get_permission(id).await?;
        if permission.is_protected() {
            return Err(AppError::Conflict(format!(
                "permission '{}:{}' is protected and cannot be deleted",
                permission.role(),
                permission.resource()
            )));
        }

        self.repository.delete_permission(id).await?;
        self.invalidate_cache().await?;

        info!(
            role = %permission.role(),
            resource = %permission.resource(),
            id = %id,
            "permission deleted"
        );
        self.append_audit(
            actor,
            AuditAction::PermissionDeleted,
            &permission,
            format!(
                "deleted permission '{}:{}'",
                permission.role(),
                permission.resource()
            ),
        )
        .await
    }

    /// Inserts default rows for pairs that have no row yet.
    ///
    /// Seeded rows are protected. Returns the number of inserted rows.
    pub async fn seed_defaults(&self, actor: &CallerIdentity) -> AppResult<usize> {
        let _guard = self.write_gate.enter().await;

        let mut inserted = 0;
        for default in default_permission_matrix() {
            if self
                .repository
                .find_by_role_resource(default.role, default.resource)
                .await?
                .is_some()
            {
                continue;
            }

            let permission = Permission::new(
                default.role,
                default.resource,
                default.capabilities,
                default.description,
            )?
            .protected(true);
            self.repository.insert_permission(permission).await?;
            inserted += 1;
        }

        if inserted == 0 {
            debug!("default permission matrix already present");
            return Ok(0);
        }

        self.invalidate_cache().await?;
        info!(inserted, "default permission matrix seeded");
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::DefaultsSeeded,
                resource_type: AUDIT_RESOURCE_TYPE.to_owned(),
                resource_id: "default_matrix".to_owned(),
                detail: Some(format!("seeded {inserted} default permission rows")),
            })
            .await?;

        Ok(inserted)
    }

    async fn invalidate_cache(&self) -> AppResult<()> {
        let generation = self.cache.invalidate_all().await.map_err(|error| {
            AppError::Internal(format!(
                "permission change was saved but the resolution cache could not be invalidated: {error}"
            ))
        })?;
        debug!(generation, "resolution cache invalidated");
        Ok(())
    }

    async fn append_audit(
        &self,
        actor: &CallerIdentity,
        action: AuditAction,
        permission: &Permission,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action,
                resource_type: AUDIT_RESOURCE_TYPE.to_owned(),
                resource_id: permission.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn duplicate_pair(role: Role, resource: Resource) -> AppError {
    AppError::Conflict(format!(
        "permission for role '{role}' on resource '{resource}' already exists; update it instead"
    ))
}

fn describe(permission: &Permission) -> String {
    permission
        .capabilities()
        .granted()
        .iter()
        .map(|capability| capability.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests;
