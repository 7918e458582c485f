//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_repository;
mod in_memory_permission_repository;
mod in_memory_resolution_cache;
mod in_memory_role_inheritance_repository;
mod noop_resolution_cache;
mod postgres_audit_repository;
mod postgres_permission_repository;
mod postgres_role_inheritance_repository;
mod redis_resolution_cache;

#[cfg(test)]
mod in_memory_engine_tests;

pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_permission_repository::InMemoryPermissionRepository;
pub use in_memory_resolution_cache::InMemoryResolutionCache;
pub use in_memory_role_inheritance_repository::InMemoryRoleInheritanceRepository;
pub use noop_resolution_cache::NoopResolutionCache;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_inheritance_repository::PostgresRoleInheritanceRepository;
pub use redis_resolution_cache::RedisResolutionCache;
