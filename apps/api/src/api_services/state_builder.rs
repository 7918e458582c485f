use std::sync::Arc;

use hrgate_application::{
    AccessResolutionService, AdminWriteGate, AuditRepository, PermissionMatrixService,
    PermissionRepository, ResolutionCache, RoleInheritanceRepository, RoleInheritanceService,
};
use hrgate_core::{AppError, AppResult};
use hrgate_infrastructure::{
    InMemoryAuditRepository, InMemoryPermissionRepository, InMemoryResolutionCache,
    InMemoryRoleInheritanceRepository, NoopResolutionCache, PostgresAuditRepository,
    PostgresPermissionRepository, PostgresRoleInheritanceRepository, RedisResolutionCache,
};
use sqlx::PgPool;

use crate::api_config::{ApiConfig, ResolutionCacheBackend, StorageBackendConfig};
use crate::state::AppState;

use super::redis::build_redis_client;

/// Port implementations selected by configuration.
pub struct EngineAdapters {
    pub permission_repository: Arc<dyn PermissionRepository>,
    pub inheritance_repository: Arc<dyn RoleInheritanceRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
    pub cache: Arc<dyn ResolutionCache>,
    pub storage_backend: &'static str,
    pub cache_backend: &'static str,
}

impl EngineAdapters {
    /// Adapters backed entirely by process memory.
    pub fn in_memory(cache: Arc<dyn ResolutionCache>, cache_backend: &'static str) -> Self {
        Self {
            permission_repository: Arc::new(InMemoryPermissionRepository::new()),
            inheritance_repository: Arc::new(InMemoryRoleInheritanceRepository::new()),
            audit_repository: Arc::new(InMemoryAuditRepository::new()),
            cache,
            storage_backend: "memory",
            cache_backend,
        }
    }
}

/// Selects adapters for the configured backends. `pool` must be present for
/// PostgreSQL storage.
pub fn build_adapters(config: &ApiConfig, pool: Option<PgPool>) -> AppResult<EngineAdapters> {
    let cache = build_resolution_cache(&config.cache)?;
    let cache_backend = config.cache.name();

    match pool {
        Some(pool) => Ok(EngineAdapters {
            permission_repository: Arc::new(PostgresPermissionRepository::new(pool.clone())),
            inheritance_repository: Arc::new(PostgresRoleInheritanceRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool)),
            cache,
            storage_backend: config.storage.name(),
            cache_backend,
        }),
        None if config.storage == StorageBackendConfig::Memory => {
            Ok(EngineAdapters::in_memory(cache, cache_backend))
        }
        None => Err(AppError::Internal(
            "postgres storage selected but no connection pool was created".to_owned(),
        )),
    }
}

fn build_resolution_cache(
    backend: &ResolutionCacheBackend,
) -> AppResult<Arc<dyn ResolutionCache>> {
    match backend {
        ResolutionCacheBackend::InMemory => Ok(Arc::new(InMemoryResolutionCache::new())),
        ResolutionCacheBackend::Redis {
            redis_url,
            key_prefix,
            ttl_seconds,
        } => Ok(Arc::new(RedisResolutionCache::new(
            build_redis_client(redis_url)?,
            key_prefix.as_str(),
            *ttl_seconds,
        ))),
        ResolutionCacheBackend::Disabled => Ok(Arc::new(NoopResolutionCache::new())),
    }
}

/// Wires the engine services around one shared cache and write gate.
pub fn build_app_state(adapters: EngineAdapters) -> AppState {
    let write_gate = AdminWriteGate::new();

    let access_resolution_service = AccessResolutionService::new(
        adapters.permission_repository.clone(),
        adapters.inheritance_repository.clone(),
        adapters.cache.clone(),
    );
    let permission_matrix_service = PermissionMatrixService::new(
        adapters.permission_repository,
        adapters.cache.clone(),
        adapters.audit_repository.clone(),
        write_gate.clone(),
    );
    let role_inheritance_service = RoleInheritanceService::new(
        adapters.inheritance_repository,
        access_resolution_service.clone(),
        adapters.cache,
        adapters.audit_repository,
        write_gate,
    );

    AppState {
        access_resolution_service,
        permission_matrix_service,
        role_inheritance_service,
        storage_backend: adapters.storage_backend,
        cache_backend: adapters.cache_backend,
    }
}
