use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use hrgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Resource, Role};
use crate::record::RecordTimestamps;

/// Maximum accepted length of a permission description.
pub const PERMISSION_DESCRIPTION_MAX_LENGTH: usize = 500;

/// Individual action a permission row can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read access.
    View,
    /// Create records.
    Create,
    /// Modify records.
    Edit,
    /// Remove records.
    Delete,
    /// Export records or documents.
    Export,
    /// Approve workflow items.
    Approve,
}

impl Capability {
    /// Returns all capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::View,
            Capability::Create,
            Capability::Edit,
            Capability::Delete,
            Capability::Export,
            Capability::Approve,
        ];

        ALL
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Approve => "approve",
        }
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown capability '{value}'")))
    }
}

impl Display for Capability {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Six independent capability flags.
///
/// Persisted as a JSON object with exactly these keys. Missing keys decode as
/// `false`, so an empty object is the deny-all set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    /// Read access.
    pub view: bool,
    /// Create records.
    pub create: bool,
    /// Modify records.
    pub edit: bool,
    /// Remove records.
    pub delete: bool,
    /// Export records or documents.
    pub export: bool,
    /// Approve workflow items.
    pub approve: bool,
}

impl PermissionSet {
    /// Returns the all-false set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            view: false,
            create: false,
            edit: false,
            delete: false,
            export: false,
            approve: false,
        }
    }

    /// Returns the all-true set.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            view: true,
            create: true,
            edit: true,
            delete: true,
            export: true,
            approve: true,
        }
    }

    /// Builds a set granting exactly the listed capabilities.
    #[must_use]
    pub fn from_capabilities(capabilities: &[Capability]) -> Self {
        capabilities
            .iter()
            .fold(Self::none(), |set, capability| set.with(*capability))
    }

    /// Returns a copy with one capability granted.
    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        *self.flag_mut(capability) = true;
        self
    }

    /// Returns whether the capability is granted.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.view,
            Capability::Create => self.create,
            Capability::Edit => self.edit,
            Capability::Delete => self.delete,
            Capability::Export => self.export,
            Capability::Approve => self.approve,
        }
    }

    /// Lists granted capabilities in declaration order.
    #[must_use]
    pub fn granted(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|capability| self.allows(*capability))
            .collect()
    }

    /// Returns whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// Per-capability logical OR.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            view: self.view || other.view,
            create: self.create || other.create,
            edit: self.edit || other.edit,
            delete: self.delete || other.delete,
            export: self.export || other.export,
            approve: self.approve || other.approve,
        }
    }

    fn flag_mut(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::View => &mut self.view,
            Capability::Create => &mut self.create,
            Capability::Edit => &mut self.edit,
            Capability::Delete => &mut self.delete,
            Capability::Export => &mut self.export,
            Capability::Approve => &mut self.approve,
        }
    }
}

impl BitOr for PermissionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for PermissionSet {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Unique identifier for a permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a new random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a permission identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid permission id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle flags of a permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// Inactive rows are ignored during resolution.
    pub is_active: bool,
    /// Protected rows cannot be deleted.
    pub is_protected: bool,
}

impl Default for PermissionFlags {
    fn default() -> Self {
        Self {
            is_active: true,
            is_protected: false,
        }
    }
}

/// One row of the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    role: Role,
    resource: Resource,
    capabilities: PermissionSet,
    description: String,
    flags: PermissionFlags,
    timestamps: RecordTimestamps,
}

impl Permission {
    /// Creates a new active, unprotected permission row.
    pub fn new(
        role: Role,
        resource: Resource,
        capabilities: PermissionSet,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: PermissionId::new(),
            role,
            resource,
            capabilities,
            description: normalize_description(description.into())?,
            flags: PermissionFlags::default(),
            timestamps: RecordTimestamps::now(),
        })
    }

    /// Rebuilds a permission row loaded from storage.
    #[must_use]
    pub fn from_stored(
        id: PermissionId,
        role: Role,
        resource: Resource,
        capabilities: PermissionSet,
        description: String,
        flags: PermissionFlags,
        timestamps: RecordTimestamps,
    ) -> Self {
        Self {
            id,
            role,
            resource,
            capabilities,
            description,
            flags,
            timestamps,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the role the row grants to.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the resource the row applies to.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Returns the granted capabilities.
    #[must_use]
    pub fn capabilities(&self) -> PermissionSet {
        self.capabilities
    }

    /// Returns the administrator-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether the row participates in resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    /// Returns whether the row is protected against deletion.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.flags.is_protected
    }

    /// Returns the lifecycle flags.
    #[must_use]
    pub fn flags(&self) -> PermissionFlags {
        self.flags
    }

    /// Returns creation and modification instants.
    #[must_use]
    pub fn timestamps(&self) -> RecordTimestamps {
        self.timestamps
    }

    /// Capabilities this row contributes to resolution.
    ///
    /// Inactive rows contribute nothing.
    #[must_use]
    pub fn effective_capabilities(&self) -> PermissionSet {
        if self.flags.is_active {
            self.capabilities
        } else {
            PermissionSet::none()
        }
    }

    /// Marks the row as protected or unprotected.
    #[must_use]
    pub fn protected(mut self, is_protected: bool) -> Self {
        self.flags.is_protected = is_protected;
        self
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) -> AppResult<()> {
        self.description = normalize_description(description.into())?;
        self.timestamps.touch();
        Ok(())
    }

    /// Replaces the capability set.
    pub fn set_capabilities(&mut self, capabilities: PermissionSet) {
        self.capabilities = capabilities;
        self.timestamps.touch();
    }

    /// Activates or deactivates the row.
    pub fn set_active(&mut self, is_active: bool) {
        self.flags.is_active = is_active;
        self.timestamps.touch();
    }

    /// Sets or clears deletion protection.
    pub fn set_protected(&mut self, is_protected: bool) {
        self.flags.is_protected = is_protected;
        self.timestamps.touch();
    }
}

fn normalize_description(value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > PERMISSION_DESCRIPTION_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "description must not exceed {PERMISSION_DESCRIPTION_MAX_LENGTH} characters"
        )));
    }

    Ok(trimmed.to_owned())
}
