use async_trait::async_trait;
use hrgate_application::{CacheGeneration, ResolutionCache};
use hrgate_core::AppResult;
use hrgate_domain::{PermissionSet, Resource, Role, RoleClosure};

/// Cache adapter that stores nothing, so every read resolves from the stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolutionCache;

impl NoopResolutionCache {
    /// Creates the no-op cache.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResolutionCache for NoopResolutionCache {
    async fn generation(&self) -> AppResult<CacheGeneration> {
        Ok(0)
    }

    async fn get_closure(&self, _role: Role) -> AppResult<Option<RoleClosure>> {
        Ok(None)
    }

    async fn put_closure(
        &self,
        _generation: CacheGeneration,
        _closure: RoleClosure,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn get_effective_permission(
        &self,
        _role: Role,
        _resource: Resource,
    ) -> AppResult<Option<PermissionSet>> {
        Ok(None)
    }

    async fn put_effective_permission(
        &self,
        _generation: CacheGeneration,
        _role: Role,
        _resource: Resource,
        _permission_set: PermissionSet,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<CacheGeneration> {
        Ok(0)
    }
}
