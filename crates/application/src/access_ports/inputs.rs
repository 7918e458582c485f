use hrgate_domain::{InheritancePriority, PermissionSet, Resource, Role};

/// Input payload for creating a permission row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Granted role.
    pub role: Role,
    /// Target resource.
    pub resource: Resource,
    /// Granted capabilities.
    pub capabilities: PermissionSet,
    /// Administrator-facing description.
    pub description: String,
    /// Protects the row against deletion.
    pub is_protected: bool,
}

/// Partial update of a permission row. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New capability set.
    pub capabilities: Option<PermissionSet>,
    /// New protected flag.
    pub is_protected: Option<bool>,
}

impl UpdatePermissionInput {
    /// Returns whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.is_active.is_none()
            && self.capabilities.is_none()
            && self.is_protected.is_none()
    }
}

/// Input payload for creating an inheritance edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInheritanceInput {
    /// Inheriting role.
    pub child_role: Role,
    /// Role inherited from.
    pub parent_role: Role,
    /// Advisory priority.
    pub priority: InheritancePriority,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Partial update of an inheritance edge. The role pair is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInheritanceInput {
    /// New active flag.
    pub is_active: Option<bool>,
    /// New advisory priority.
    pub priority: Option<InheritancePriority>,
    /// New notes; a blank value clears them.
    pub notes: Option<String>,
}

impl UpdateRoleInheritanceInput {
    /// Returns whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_active.is_none() && self.priority.is_none() && self.notes.is_none()
    }
}
