use std::collections::HashMap;

use async_trait::async_trait;
use hrgate_application::RoleInheritanceRepository;
use hrgate_core::{AppError, AppResult};
use hrgate_domain::{InheritanceId, RoleInheritance};
use tokio::sync::RwLock;

/// In-memory role inheritance graph implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleInheritanceRepository {
    edges: RwLock<HashMap<InheritanceId, RoleInheritance>>,
}

impl InMemoryRoleInheritanceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn active_pair_taken(
    edges: &HashMap<InheritanceId, RoleInheritance>,
    edge: &RoleInheritance,
) -> bool {
    edge.is_active()
        && edges.values().any(|stored| {
            stored.id() != edge.id()
                && stored.is_active()
                && stored.child_role() == edge.child_role()
                && stored.parent_role() == edge.parent_role()
        })
}

fn active_pair_conflict(edge: &RoleInheritance) -> AppError {
    AppError::Conflict(format!(
        "role '{}' already inherits from '{}'",
        edge.child_role(),
        edge.parent_role()
    ))
}

#[async_trait]
impl RoleInheritanceRepository for InMemoryRoleInheritanceRepository {
    async fn insert_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        let mut edges = self.edges.write().await;

        if active_pair_taken(&edges, &edge) {
            return Err(active_pair_conflict(&edge));
        }

        edges.insert(edge.id(), edge.clone());
        Ok(edge)
    }

    async fn save_inheritance(&self, edge: RoleInheritance) -> AppResult<RoleInheritance> {
        let mut edges = self.edges.write().await;

        if !edges.contains_key(&edge.id()) {
            return Err(AppError::NotFound(format!(
                "role inheritance '{}' was not found",
                edge.id()
            )));
        }
        if active_pair_taken(&edges, &edge) {
            return Err(active_pair_conflict(&edge));
        }

        edges.insert(edge.id(), edge.clone());
        Ok(edge)
    }

    async fn delete_inheritance(&self, id: InheritanceId) -> AppResult<()> {
        self.edges
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role inheritance '{id}' was not found")))
    }

    async fn find_inheritance(&self, id: InheritanceId) -> AppResult<Option<RoleInheritance>> {
        Ok(self.edges.read().await.get(&id).cloned())
    }

    async fn list_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        let edges = self.edges.read().await;

        let mut values: Vec<RoleInheritance> = edges.values().cloned().collect();
        values.sort_by_key(|edge| {
            (
                edge.child_role(),
                edge.parent_role(),
                edge.timestamps().created_at,
            )
        });

        Ok(values)
    }

    async fn list_active_inheritance(&self) -> AppResult<Vec<RoleInheritance>> {
        Ok(self
            .list_inheritance()
            .await?
            .into_iter()
            .filter(RoleInheritance::is_active)
            .collect())
    }
}
