//! Domain entities and invariants of the permission resolution engine.

#![forbid(unsafe_code)]

mod audit;
mod catalog;
mod defaults;
mod graph;
mod inheritance;
mod permission;
mod record;

pub use audit::AuditAction;
pub use catalog::{
    Resource, Role, RoleLevel, all_resources, all_roles, is_valid_resource, is_valid_role,
};
pub use defaults::{
    DefaultInheritance, DefaultPermission, default_inheritance, default_permission_matrix,
};
pub use graph::{InheritanceGraph, RoleClosure};
pub use inheritance::{
    INHERITANCE_NOTES_MAX_LENGTH, InheritanceId, InheritancePriority, RoleInheritance,
};
pub use permission::{
    Capability, PERMISSION_DESCRIPTION_MAX_LENGTH, Permission, PermissionFlags, PermissionId,
    PermissionSet,
};
pub use record::RecordTimestamps;
