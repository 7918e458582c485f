use hrgate_domain::{Role, RoleClosure, RoleInheritance};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for inheritance edge creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-inheritance-request.ts"
)]
pub struct CreateRoleInheritanceRequest {
    pub child_role: String,
    pub parent_role: String,
    pub priority: Option<u8>,
    pub notes: Option<String>,
}

/// Incoming payload for partial inheritance edge updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-inheritance-request.ts"
)]
pub struct UpdateRoleInheritanceRequest {
    pub is_active: Option<bool>,
    pub priority: Option<u8>,
    pub notes: Option<String>,
}

/// API representation of an inheritance edge.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-inheritance-response.ts"
)]
pub struct RoleInheritanceResponse {
    pub id: String,
    pub child_role: String,
    pub parent_role: String,
    pub priority: u8,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RoleInheritance> for RoleInheritanceResponse {
    fn from(value: RoleInheritance) -> Self {
        let timestamps = value.timestamps();

        Self {
            id: value.id().to_string(),
            child_role: value.child_role().as_str().to_owned(),
            parent_role: value.parent_role().as_str().to_owned(),
            priority: value.priority().value(),
            is_active: value.is_active(),
            notes: value.notes().map(str::to_owned),
            created_at: timestamps.created_at.to_rfc3339(),
            updated_at: timestamps.updated_at.to_rfc3339(),
        }
    }
}

/// One node of the inheritance DAG with its direct active parents.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-hierarchy-entry-response.ts"
)]
pub struct RoleHierarchyEntryResponse {
    pub role: String,
    pub level: u8,
    pub parents: Vec<String>,
}

impl RoleHierarchyEntryResponse {
    pub fn new(role: Role, parents: Vec<Role>) -> Self {
        Self {
            role: role.as_str().to_owned(),
            level: role.level(),
            parents: parents
                .into_iter()
                .map(|parent| parent.as_str().to_owned())
                .collect(),
        }
    }
}

/// Resolved closure of a role in breadth-first order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-closure-response.ts"
)]
pub struct RoleClosureResponse {
    pub role: String,
    pub roles: Vec<String>,
}

impl From<RoleClosure> for RoleClosureResponse {
    fn from(value: RoleClosure) -> Self {
        Self {
            role: value.root().as_str().to_owned(),
            roles: value
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }
}
