use std::collections::HashMap;

use async_trait::async_trait;
use hrgate_application::{CacheGeneration, ResolutionCache};
use hrgate_core::AppResult;
use hrgate_domain::{PermissionSet, Resource, Role, RoleClosure};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ResolutionCacheState {
    generation: CacheGeneration,
    closures: HashMap<Role, RoleClosure>,
    effective: HashMap<(Role, Resource), PermissionSet>,
}

/// Process-local resolution cache.
///
/// Entries live until the next invalidation; the catalog bounds the key
/// space, so no expiry is needed.
#[derive(Debug, Default)]
pub struct InMemoryResolutionCache {
    state: RwLock<ResolutionCacheState>,
}

impl InMemoryResolutionCache {
    /// Creates an empty cache at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResolutionCache for InMemoryResolutionCache {
    async fn generation(&self) -> AppResult<CacheGeneration> {
        Ok(self.state.read().await.generation)
    }

    async fn get_closure(&self, role: Role) -> AppResult<Option<RoleClosure>> {
        Ok(self.state.read().await.closures.get(&role).cloned())
    }

    async fn put_closure(&self, generation: CacheGeneration, closure: RoleClosure) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return Ok(());
        }

        state.closures.insert(closure.root(), closure);
        Ok(())
    }

    async fn get_effective_permission(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<PermissionSet>> {
        Ok(self
            .state
            .read()
            .await
            .effective
            .get(&(role, resource))
            .copied())
    }

    async fn put_effective_permission(
        &self,
        generation: CacheGeneration,
        role: Role,
        resource: Resource,
        permission_set: PermissionSet,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return Ok(());
        }

        state.effective.insert((role, resource), permission_set);
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<CacheGeneration> {
        let mut state = self.state.write().await;
        state.generation = state.generation.wrapping_add(1);
        state.closures.clear();
        state.effective.clear();

        Ok(state.generation)
    }
}
