use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by administrative use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a permission row is created.
    PermissionCreated,
    /// Emitted when a permission row is updated.
    PermissionUpdated,
    /// Emitted when a permission row is deleted.
    PermissionDeleted,
    /// Emitted when an inheritance edge is created.
    RoleInheritanceCreated,
    /// Emitted when an inheritance edge is updated.
    RoleInheritanceUpdated,
    /// Emitted when an inheritance edge is deleted.
    RoleInheritanceDeleted,
    /// Emitted when default rows and edges are seeded.
    DefaultsSeeded,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionCreated => "access.permission.created",
            Self::PermissionUpdated => "access.permission.updated",
            Self::PermissionDeleted => "access.permission.deleted",
            Self::RoleInheritanceCreated => "access.role_inheritance.created",
            Self::RoleInheritanceUpdated => "access.role_inheritance.updated",
            Self::RoleInheritanceDeleted => "access.role_inheritance.deleted",
            Self::DefaultsSeeded => "access.defaults.seeded",
        }
    }
}
