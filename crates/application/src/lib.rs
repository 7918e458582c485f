//! Application services and ports of the permission resolution engine.

#![forbid(unsafe_code)]

mod access_ports;
mod access_resolution_service;
mod admin_write_gate;
mod permission_matrix_service;
mod role_inheritance_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AuditEvent, AuditRepository, CacheGeneration, CreatePermissionInput,
    CreateRoleInheritanceInput, PermissionRepository, ResolutionCache,
    RoleInheritanceRepository, UpdatePermissionInput, UpdateRoleInheritanceInput,
};
pub use access_resolution_service::AccessResolutionService;
pub use admin_write_gate::AdminWriteGate;
pub use permission_matrix_service::PermissionMatrixService;
pub use role_inheritance_service::RoleInheritanceService;
