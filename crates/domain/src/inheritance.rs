use std::fmt::{Display, Formatter};

use hrgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Role;
use crate::record::RecordTimestamps;

/// Maximum accepted length of inheritance notes.
pub const INHERITANCE_NOTES_MAX_LENGTH: usize = 1000;

/// Unique identifier for a role inheritance edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritanceId(Uuid);

impl InheritanceId {
    /// Creates a new random edge identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an edge identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into an edge identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value).map(Self).map_err(|error| {
            AppError::Validation(format!("invalid role inheritance id '{value}': {error}"))
        })
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InheritanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InheritanceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Advisory edge priority in the range 1-10.
///
/// Never consulted by permission resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct InheritancePriority(u8);

impl InheritancePriority {
    /// Lowest accepted priority.
    pub const MIN: u8 = 1;
    /// Highest accepted priority.
    pub const MAX: u8 = 10;

    /// Creates a validated priority.
    pub fn new(value: u8) -> AppResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(AppError::Validation(format!(
                "priority must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }

        Ok(Self(value))
    }

    /// Returns the numeric priority.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for InheritancePriority {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for InheritancePriority {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InheritancePriority> for u8 {
    fn from(value: InheritancePriority) -> Self {
        value.0
    }
}

/// Directed edge: `child_role` acquires everything `parent_role` is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInheritance {
    id: InheritanceId,
    child_role: Role,
    parent_role: Role,
    priority: InheritancePriority,
    is_active: bool,
    notes: Option<String>,
    timestamps: RecordTimestamps,
}

impl RoleInheritance {
    /// Creates a new active edge.
    ///
    /// Rejects self-inheritance. Cycle checks need the whole graph and live in
    /// [`crate::InheritanceGraph`].
    pub fn new(
        child_role: Role,
        parent_role: Role,
        priority: InheritancePriority,
        notes: Option<String>,
    ) -> AppResult<Self> {
        if child_role == parent_role {
            return Err(AppError::Validation(format!(
                "role '{child_role}' cannot inherit from itself"
            )));
        }

        Ok(Self {
            id: InheritanceId::new(),
            child_role,
            parent_role,
            priority,
            is_active: true,
            notes: normalize_notes(notes)?,
            timestamps: RecordTimestamps::now(),
        })
    }

    /// Rebuilds an edge loaded from storage.
    #[must_use]
    pub fn from_stored(
        id: InheritanceId,
        child_role: Role,
        parent_role: Role,
        priority: InheritancePriority,
        is_active: bool,
        notes: Option<String>,
        timestamps: RecordTimestamps,
    ) -> Self {
        Self {
            id,
            child_role,
            parent_role,
            priority,
            is_active,
            notes,
            timestamps,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub fn id(&self) -> InheritanceId {
        self.id
    }

    /// Returns the inheriting role.
    #[must_use]
    pub fn child_role(&self) -> Role {
        self.child_role
    }

    /// Returns the role being inherited from.
    #[must_use]
    pub fn parent_role(&self) -> Role {
        self.parent_role
    }

    /// Returns the advisory priority.
    #[must_use]
    pub fn priority(&self) -> InheritancePriority {
        self.priority
    }

    /// Returns whether the edge participates in resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns creation and modification instants.
    #[must_use]
    pub fn timestamps(&self) -> RecordTimestamps {
        self.timestamps
    }

    /// Activates or deactivates the edge.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.timestamps.touch();
    }

    /// Replaces the advisory priority.
    pub fn set_priority(&mut self, priority: InheritancePriority) {
        self.priority = priority;
        self.timestamps.touch();
    }

    /// Replaces the notes. Blank notes are cleared.
    pub fn set_notes(&mut self, notes: Option<String>) -> AppResult<()> {
        self.notes = normalize_notes(notes)?;
        self.timestamps.touch();
        Ok(())
    }
}

fn normalize_notes(notes: Option<String>) -> AppResult<Option<String>> {
    let notes = notes.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    });

    if notes
        .as_deref()
        .is_some_and(|value| value.chars().count() > INHERITANCE_NOTES_MAX_LENGTH)
    {
        return Err(AppError::Validation(format!(
            "notes must not exceed {INHERITANCE_NOTES_MAX_LENGTH} characters"
        )));
    }

    Ok(notes)
}
