mod access;
mod catalog;
mod common;
mod inheritance;
mod permissions;

pub use access::EffectivePermissionResponse;
pub use catalog::RoleLevelResponse;
pub use common::HealthResponse;
pub use inheritance::{
    CreateRoleInheritanceRequest, RoleClosureResponse, RoleHierarchyEntryResponse,
    RoleInheritanceResponse, UpdateRoleInheritanceRequest,
};
pub use permissions::{
    CreatePermissionRequest, PermissionResponse, PermissionSetDto, UpdatePermissionRequest,
};
