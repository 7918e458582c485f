use async_trait::async_trait;
use hrgate_core::AppResult;
use hrgate_domain::{PermissionSet, Resource, Role, RoleClosure};

/// Monotonic counter bumped by every invalidation.
pub type CacheGeneration = u64;

/// Memoization port in front of closure and effective-permission resolution.
///
/// Invalidation is coarse: [`ResolutionCache::invalidate_all`] drops every
/// entry and advances the generation. Populating calls carry the generation
/// observed before the value was computed; implementations must discard a
/// population whose generation is no longer current.
#[async_trait]
pub trait ResolutionCache: Send + Sync {
    /// Returns the current generation.
    async fn generation(&self) -> AppResult<CacheGeneration>;

    /// Returns a cached closure for the role.
    async fn get_closure(&self, role: Role) -> AppResult<Option<RoleClosure>>;

    /// Stores a closure computed under `generation`.
    async fn put_closure(&self, generation: CacheGeneration, closure: RoleClosure) -> AppResult<()>;

    /// Returns a cached effective permission set.
    async fn get_effective_permission(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<PermissionSet>>;

    /// Stores an effective permission set computed under `generation`.
    async fn put_effective_permission(
        &self,
        generation: CacheGeneration,
        role: Role,
        resource: Resource,
        permission_set: PermissionSet,
    ) -> AppResult<()>;

    /// Drops every entry and returns the new generation.
    async fn invalidate_all(&self) -> AppResult<CacheGeneration>;
}
