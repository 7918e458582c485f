//! Closed catalogs of roles and resources.
//!
//! Declaration order is the catalog order. It drives `Ord` on both enums and
//! therefore every deterministic traversal in the inheritance graph.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use hrgate_core::AppError;
use serde::{Deserialize, Serialize};

/// Role a caller can act under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator.
    Admin,
    /// General manager with cross-department oversight.
    GeneralManager,
    /// Combined HR and public relations.
    HrAndPr,
    /// Human resources.
    Hr,
    /// HR for blue- and gray-collar staff.
    HrBlueGray,
    /// HR for white-collar staff.
    HrWhite,
    /// Department manager.
    Manager,
    /// Payroll officer.
    Payroll,
    /// Accountant.
    Accountant,
    /// Shift or team supervisor.
    Supervisor,
    /// Regular employee.
    Employee,
}

impl Role {
    /// Returns all catalog roles in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Admin,
            Role::GeneralManager,
            Role::HrAndPr,
            Role::Hr,
            Role::HrBlueGray,
            Role::HrWhite,
            Role::Manager,
            Role::Payroll,
            Role::Accountant,
            Role::Supervisor,
            Role::Employee,
        ];

        ALL
    }

    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::GeneralManager => "general_manager",
            Self::HrAndPr => "hr_and_pr",
            Self::Hr => "hr",
            Self::HrBlueGray => "hr_blue_gray",
            Self::HrWhite => "hr_white",
            Self::Manager => "manager",
            Self::Payroll => "payroll",
            Self::Accountant => "accountant",
            Self::Supervisor => "supervisor",
            Self::Employee => "employee",
        }
    }

    /// Returns the advisory permission level (1-10).
    ///
    /// Display ordering only. Authorization never reads it.
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::Admin => 10,
            Self::GeneralManager => 9,
            Self::HrAndPr => 8,
            Self::Hr => 7,
            Self::HrBlueGray | Self::HrWhite => 6,
            Self::Manager | Self::Payroll => 5,
            Self::Accountant => 4,
            Self::Supervisor => 3,
            Self::Employee => 1,
        }
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Resource a permission row is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Employee records.
    Employees,
    /// Department structure.
    Departments,
    /// Payroll runs and payslips.
    Payroll,
    /// Benefit plans and enrolments.
    Benefits,
    /// Onboarding checklists.
    Onboarding,
    /// Generated documents and exports.
    Documents,
    /// Internal messaging.
    Messages,
    /// Attendance and time tracking.
    Attendance,
    /// Leave requests.
    LeaveRequests,
    /// Reports.
    Reports,
    /// The permission matrix and role inheritance itself.
    Permissions,
    /// System configuration.
    Configuration,
}

impl Resource {
    /// Returns all catalog resources in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Resource] = &[
            Resource::Employees,
            Resource::Departments,
            Resource::Payroll,
            Resource::Benefits,
            Resource::Onboarding,
            Resource::Documents,
            Resource::Messages,
            Resource::Attendance,
            Resource::LeaveRequests,
            Resource::Reports,
            Resource::Permissions,
            Resource::Configuration,
        ];

        ALL
    }

    /// Returns the stable storage value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::Payroll => "payroll",
            Self::Benefits => "benefits",
            Self::Onboarding => "onboarding",
            Self::Documents => "documents",
            Self::Messages => "messages",
            Self::Attendance => "attendance",
            Self::LeaveRequests => "leave_requests",
            Self::Reports => "reports",
            Self::Permissions => "permissions",
            Self::Configuration => "configuration",
        }
    }

    /// Parses a transport value into a resource.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Resource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource '{value}'")))
    }
}

impl Display for Resource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Catalog role paired with its advisory level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleLevel {
    /// Catalog role.
    pub role: Role,
    /// Advisory display level.
    pub level: u8,
}

/// Returns whether the name belongs to the role catalog.
#[must_use]
pub fn is_valid_role(name: &str) -> bool {
    Role::from_str(name).is_ok()
}

/// Returns whether the name belongs to the resource catalog.
#[must_use]
pub fn is_valid_resource(name: &str) -> bool {
    Resource::from_str(name).is_ok()
}

/// Lists catalog roles ordered by level, highest first, ties in catalog order.
#[must_use]
pub fn all_roles() -> Vec<RoleLevel> {
    let mut roles: Vec<RoleLevel> = Role::all()
        .iter()
        .map(|role| RoleLevel {
            role: *role,
            level: role.level(),
        })
        .collect();
    roles.sort_by(|left, right| {
        right
            .level
            .cmp(&left.level)
            .then_with(|| left.role.cmp(&right.role))
    });
    roles
}

/// Lists catalog resources in catalog order.
#[must_use]
pub fn all_resources() -> Vec<Resource> {
    Resource::all().to_vec()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Resource, Role, all_roles, is_valid_resource, is_valid_role};

    #[test]
    fn every_role_roundtrips_through_storage_value() {
        for role in Role::all() {
            assert_eq!(Role::from_str(role.as_str()).ok(), Some(*role));
        }
    }

    #[test]
    fn every_resource_roundtrips_through_storage_value() {
        for resource in Resource::all() {
            assert_eq!(Resource::from_str(resource.as_str()).ok(), Some(*resource));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role("Admin"));
        assert!(!is_valid_resource("salaries"));
        assert!(is_valid_role("hr_blue_gray"));
        assert!(is_valid_resource("leave_requests"));
    }

    #[test]
    fn role_levels_stay_in_advisory_range() {
        assert!(Role::all().iter().all(|role| (1..=10).contains(&role.level())));
    }

    #[test]
    fn all_roles_sorts_by_level_then_catalog_order() {
        let roles = all_roles();
        assert_eq!(roles.len(), Role::all().len());
        assert_eq!(roles[0].role, Role::Admin);
        assert_eq!(roles.last().map(|entry| entry.role), Some(Role::Employee));

        let blue_gray = roles.iter().position(|entry| entry.role == Role::HrBlueGray);
        let white = roles.iter().position(|entry| entry.role == Role::HrWhite);
        assert!(blue_gray < white);
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let encoded = serde_json::to_string(&Role::GeneralManager).unwrap_or_default();
        assert_eq!(encoded, "\"general_manager\"");
    }
}
