mod audit;
mod cache;
mod inputs;
mod repositories;

pub use audit::{AuditEvent, AuditRepository};
pub use cache::{CacheGeneration, ResolutionCache};
pub use inputs::{
    CreatePermissionInput, CreateRoleInheritanceInput, UpdatePermissionInput,
    UpdateRoleInheritanceInput,
};
pub use repositories::{PermissionRepository, RoleInheritanceRepository};
