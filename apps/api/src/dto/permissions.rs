use hrgate_domain::{Permission, PermissionSet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Capability flags as exchanged with the admin UI. Missing flags are false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-set.ts"
)]
pub struct PermissionSetDto {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub export: bool,
    pub approve: bool,
}

impl From<PermissionSet> for PermissionSetDto {
    fn from(value: PermissionSet) -> Self {
        Self {
            view: value.view,
            create: value.create,
            edit: value.edit,
            delete: value.delete,
            export: value.export,
            approve: value.approve,
        }
    }
}

impl From<PermissionSetDto> for PermissionSet {
    fn from(value: PermissionSetDto) -> Self {
        Self {
            view: value.view,
            create: value.create,
            edit: value.edit,
            delete: value.delete,
            export: value.export,
            approve: value.approve,
        }
    }
}

/// Incoming payload for permission row creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub role: String,
    pub resource: String,
    #[serde(default)]
    pub permissions: PermissionSetDto,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_protected: bool,
}

/// Incoming payload for partial permission row updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub permissions: Option<PermissionSetDto>,
    pub is_protected: Option<bool>,
}

/// API representation of a permission row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: String,
    pub role: String,
    pub resource: String,
    pub permissions: PermissionSetDto,
    pub description: String,
    pub is_active: bool,
    pub is_protected: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        let timestamps = value.timestamps();

        Self {
            id: value.id().to_string(),
            role: value.role().as_str().to_owned(),
            resource: value.resource().as_str().to_owned(),
            permissions: value.capabilities().into(),
            description: value.description().to_owned(),
            is_active: value.is_active(),
            is_protected: value.is_protected(),
            created_at: timestamps.created_at.to_rfc3339(),
            updated_at: timestamps.updated_at.to_rfc3339(),
        }
    }
}
