//! Default permission matrix and inheritance edges seeded on first start.

use crate::catalog::{Resource, Role};
use crate::permission::{Capability, PermissionSet};

use Capability::{Approve, Create, Delete, Edit, Export, View};

/// Seeded permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPermission {
    /// Granted role.
    pub role: Role,
    /// Target resource.
    pub resource: Resource,
    /// Granted capabilities.
    pub capabilities: PermissionSet,
    /// Administrator-facing description.
    pub description: &'static str,
}

/// Seeded inheritance edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultInheritance {
    /// Inheriting role.
    pub child_role: Role,
    /// Role inherited from.
    pub parent_role: Role,
    /// Notes stored on the edge.
    pub notes: &'static str,
}

fn row(
    role: Role,
    resource: Resource,
    capabilities: &[Capability],
    description: &'static str,
) -> DefaultPermission {
    DefaultPermission {
        role,
        resource,
        capabilities: PermissionSet::from_capabilities(capabilities),
        description,
    }
}

/// Returns the default permission matrix.
///
/// Admin holds every capability directly; other roles pick up shared grants
/// through [`default_inheritance`].
#[must_use]
pub fn default_permission_matrix() -> Vec<DefaultPermission> {
    let mut rows: Vec<DefaultPermission> = Resource::all()
        .iter()
        .map(|resource| DefaultPermission {
            role: Role::Admin,
            resource: *resource,
            capabilities: PermissionSet::full(),
            description: "administrators manage every resource",
        })
        .collect();

    rows.extend([
        row(Role::Employee, Resource::Messages, &[View, Create], "employees exchange messages"),
        row(Role::Employee, Resource::LeaveRequests, &[View, Create], "employees file leave requests"),
        row(Role::Employee, Resource::Documents, &[View], "employees read their documents"),
        row(Role::Employee, Resource::Benefits, &[View], "employees read benefit plans"),
        row(Role::Supervisor, Resource::Attendance, &[View, Edit], "supervisors correct attendance"),
        row(Role::Manager, Resource::Employees, &[View], "managers see their staff"),
        row(Role::Manager, Resource::LeaveRequests, &[Approve], "managers approve leave"),
        row(Role::Manager, Resource::Attendance, &[Approve], "managers sign off attendance"),
        row(Role::Manager, Resource::Reports, &[View], "managers read department reports"),
        row(Role::GeneralManager, Resource::Reports, &[Export], "general managers export reports"),
        row(Role::GeneralManager, Resource::Payroll, &[View, Approve], "general managers approve payroll runs"),
        row(Role::Hr, Resource::Employees, &[View, Create, Edit, Export], "HR maintains employee records"),
        row(Role::Hr, Resource::Departments, &[View], "HR reads department structure"),
        row(Role::Hr, Resource::Onboarding, &[View, Create, Edit, Approve], "HR runs onboarding"),
        row(Role::Hr, Resource::Documents, &[Create, Export], "HR issues documents"),
        row(Role::Hr, Resource::LeaveRequests, &[Approve], "HR approves leave"),
        row(Role::HrAndPr, Resource::Messages, &[Edit, Delete], "HR and PR moderate messaging"),
        row(Role::HrBlueGray, Resource::Employees, &[View, Edit], "blue/gray collar HR maintains its staff"),
        row(Role::HrWhite, Resource::Employees, &[View, Edit], "white collar HR maintains its staff"),
        row(Role::Payroll, Resource::Payroll, &[View, Create, Edit, Export], "payroll prepares payroll runs"),
        row(Role::Payroll, Resource::Employees, &[View], "payroll reads employee master data"),
        row(Role::Accountant, Resource::Payroll, &[View, Export], "accountants reconcile payroll"),
        row(Role::Accountant, Resource::Reports, &[View, Export], "accountants export financial reports"),
    ]);

    rows
}

fn edge(child_role: Role, parent_role: Role, notes: &'static str) -> DefaultInheritance {
    DefaultInheritance {
        child_role,
        parent_role,
        notes,
    }
}

/// Returns the default inheritance edges.
#[must_use]
pub fn default_inheritance() -> Vec<DefaultInheritance> {
    vec![
        edge(Role::GeneralManager, Role::Manager, "general managers act as managers"),
        edge(Role::Manager, Role::Supervisor, "managers supervise"),
        edge(Role::Supervisor, Role::Employee, "supervisors are employees"),
        edge(Role::HrAndPr, Role::Hr, "HR and PR includes HR"),
        edge(Role::Hr, Role::Employee, "HR staff are employees"),
        edge(Role::HrBlueGray, Role::Employee, "HR staff are employees"),
        edge(Role::HrWhite, Role::Employee, "HR staff are employees"),
        edge(Role::Payroll, Role::Employee, "payroll staff are employees"),
        edge(Role::Accountant, Role::Employee, "accountants are employees"),
    ]
}
