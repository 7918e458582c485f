use std::collections::BTreeMap;
use std::sync::Arc;

use hrgate_core::{AppError, AppResult, CallerIdentity};
use hrgate_domain::{
    AuditAction, InheritanceGraph, InheritanceId, InheritancePriority, Role, RoleClosure,
    RoleInheritance, default_inheritance,
};
use tracing::{debug, info, warn};

use crate::access_ports::{
    AuditEvent, AuditRepository, CreateRoleInheritanceInput, ResolutionCache,
    RoleInheritanceRepository, UpdateRoleInheritanceInput,
};
use crate::{AccessResolutionService, AdminWriteGate};

const AUDIT_RESOURCE_TYPE: &str = "access_role_inheritance";

/// Administrative service for the role inheritance graph.
#[derive(Clone)]
pub struct RoleInheritanceService {
    repository: Arc<dyn RoleInheritanceRepository>,
    resolution_service: AccessResolutionService,
    cache: Arc<dyn ResolutionCache>,
    audit_repository: Arc<dyn AuditRepository>,
    write_gate: AdminWriteGate,
}

impl RoleInheritanceService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleInheritanceRepository>,
        resolution_service: AccessResolutionService,
        cache: Arc<dyn ResolutionCache>,
        audit_repository: Arc<dyn AuditRepository>,
        write_gate: AdminWriteGate,
    ) -> Self {
        Self {
            repository,
            resolution_service,
            cache,
            audit_repository,
            write_gate,
        }
    }

    /// Lists every edge, active or not.
    pub async fn list_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        self.repository.list_inheritance().await
    }

    /// Returns one edge by identifier.
    pub async fn get_inheritance(&self, id: InheritanceId) -> AppResult<RoleInheritance> {
        self.repository
            .find_inheritance(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role inheritance '{id}' was not found")))
    }

    /// Returns the direct active parents of every catalog role.
    pub async fn hierarchy(&self) -> AppResult<BTreeMap<Role, Vec<Role>>> {
        let edges = self.repository.list_active_inheritance().await?;
        Ok(InheritanceGraph::from_active_edges(&edges).hierarchy())
    }

    /// Resolves the closure of a role through the resolution cache.
    pub async fn resolve(&self, role: Role) -> AppResult<RoleClosure> {
        self.resolution_service.resolve_closure(role).await
    }

    /// Creates an edge after duplicate and cycle checks.
    pub async fn create_inheritance(
        &self,
        actor: &CallerIdentity,
        input: CreateRoleInheritanceInput,
    ) -> AppResult<RoleInheritance> {
        let edge = RoleInheritance::new(
            input.child_role,
            input.parent_role,
            input.priority,
            input.notes,
        )?;

        let _guard = self.write_gate.enter().await;

        let active_edges = self.repository.list_active_inheritance().await?;
        ensure_no_active_duplicate(&active_edges, &edge)?;
        ensure_acyclic(&active_edges, &edge)?;

        let edge = self.repository.insert_inheritance(edge).await?;
        self.invalidate_cache().await?;

        info!(
            child = %edge.child_role(),
            parent = %edge.parent_role(),
            id = %edge.id(),
            "role inheritance created"
        );
        self.append_audit(
            actor,
            AuditAction::RoleInheritanceCreated,
            &edge,
            format!(
                "role '{}' now inherits from '{}'",
                edge.child_role(),
                edge.parent_role()
            ),
        )
        .await?;

        Ok(edge)
    }

    /// Updates the mutable fields of an edge.
    ///
    /// Reactivation re-runs the duplicate and cycle checks against the graph
    /// without this edge.
    pub async fn update_inheritance(
        &self,
        actor: &CallerIdentity,
        id: InheritanceId,
        input: UpdateRoleInheritanceInput,
    ) -> AppResult<RoleInheritance> {
        let _guard = self.write_gate.enter().await;

        let mut edge = self.get_inheritance(id).await?;
        if input.is_empty() {
            return Err(AppError::Validation(
                "role inheritance update must change at least one field".to_owned(),
            ));
        }

        let reactivating = input.is_active == Some(true) && !edge.is_active();

        if let Some(priority) = input.priority {
            edge.set_priority(priority);
        }
        if let Some(notes) = input.notes {
            edge.set_notes(Some(notes))?;
        }
        if let Some(is_active) = input.is_active {
            edge.set_active(is_active);
        }

        if reactivating {
            let other_active_edges: Vec<RoleInheritance> = self
                .repository
                .list_active_inheritance()
                .await?
                .into_iter()
                .filter(|stored| stored.id() != id)
                .collect();
            ensure_no_active_duplicate(&other_active_edges, &edge)?;
            ensure_acyclic(&other_active_edges, &edge)?;
        }

        let edge = self.repository.save_inheritance(edge).await?;
        self.invalidate_cache().await?;

        info!(
            child = %edge.child_role(),
            parent = %edge.parent_role(),
            id = %edge.id(),
            active = edge.is_active(),
            "role inheritance updated"
        );
        self.append_audit(
            actor,
            AuditAction::RoleInheritanceUpdated,
            &edge,
            format!(
                "updated inheritance '{}' -> '{}' (active={}, priority={})",
                edge.child_role(),
                edge.parent_role(),
                edge.is_active(),
                edge.priority().value()
            ),
        )
        .await?;

        Ok(edge)
    }

    /// Deletes an edge and invalidates the resolution cache.
    pub async fn delete_inheritance(
        &self,
        actor: &CallerIdentity,
        id: InheritanceId,
    ) -> AppResult<()> {
        let _guard = self.write_gate.enter().await;

        let edge = self.get_inheritance(id).await?;
        self.repository.delete_inheritance(id).await?;
        self.invalidate_cache().await?;

        info!(
            child = %edge.child_role(),
            parent = %edge.parent_role(),
            id = %id,
            "role inheritance deleted"
        );
        self.append_audit(
            actor,
            AuditAction::RoleInheritanceDeleted,
            &edge,
            format!(
                "role '{}' no longer inherits from '{}'",
                edge.child_role(),
                edge.parent_role()
            ),
        )
        .await
    }

    /// Inserts default edges for pairs that have no edge yet.
    ///
    /// Pairs with an existing edge, even an inactive one, are left alone so a
    /// deliberate deactivation survives restarts. Returns the number of
    /// inserted edges.
    pub async fn seed_defaults(&self, actor: &CallerIdentity) -> AppResult<usize> {
        let _guard = self.write_gate.enter().await;

        let existing = self.repository.list_inheritance().await?;
        let mut graph = InheritanceGraph::from_active_edges(&existing);
        let mut inserted = 0;

        for default in default_inheritance() {
            let already_present = existing.iter().any(|edge| {
                edge.child_role() == default.child_role && edge.parent_role() == default.parent_role
            });
            if already_present {
                continue;
            }

            if graph.would_create_cycle(default.child_role, default.parent_role) {
                warn!(
                    child = %default.child_role,
                    parent = %default.parent_role,
                    "skipping default role inheritance that would close a cycle"
                );
                continue;
            }

            let edge = RoleInheritance::new(
                default.child_role,
                default.parent_role,
                InheritancePriority::default(),
                Some(default.notes.to_owned()),
            )?;
            self.repository.insert_inheritance(edge).await?;
            graph.add_edge(default.child_role, default.parent_role);
            inserted += 1;
        }

        if inserted == 0 {
            debug!("default role inheritance already present");
            return Ok(0);
        }

        self.invalidate_cache().await?;
        info!(inserted, "default role inheritance seeded");
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::DefaultsSeeded,
                resource_type: AUDIT_RESOURCE_TYPE.to_owned(),
                resource_id: "default_inheritance".to_owned(),
                detail: Some(format!("seeded {inserted} default role inheritance edges")),
            })
            .await?;

        Ok(inserted)
    }

    async fn invalidate_cache(&self) -> AppResult<()> {
        let generation = self.cache.invalidate_all().await.map_err(|error| {
            AppError::Internal(format!(
                "role inheritance change was saved but the resolution cache could not be invalidated: {error}"
            ))
        })?;
        debug!(generation, "resolution cache invalidated");
        Ok(())
    }

    async fn append_audit(
        &self,
        actor: &CallerIdentity,
        action: AuditAction,
        edge: &RoleInheritance,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action,
                resource_type: AUDIT_RESOURCE_TYPE.to_owned(),
                resource_id: edge.id().to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn ensure_no_active_duplicate(
    active_edges: &[RoleInheritance],
    edge: &RoleInheritance,
) -> AppResult<()> {
    let duplicate = active_edges.iter().any(|stored| {
        stored.child_role() == edge.child_role() && stored.parent_role() == edge.parent_role()
    });

    if duplicate {
        return Err(AppError::Conflict(format!(
            "role '{}' already inherits from '{}'",
            edge.child_role(),
            edge.parent_role()
        )));
    }

    Ok(())
}

fn ensure_acyclic(active_edges: &[RoleInheritance], edge: &RoleInheritance) -> AppResult<()> {
    let graph = InheritanceGraph::from_active_edges(active_edges);
    if graph.would_create_cycle(edge.child_role(), edge.parent_role()) {
        return Err(AppError::Conflict(format!(
            "circular dependency detected: '{}' already inherits from '{}'",
            edge.parent_role(),
            edge.child_role()
        )));
    }

    Ok(())
}
