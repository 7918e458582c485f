use hrgate_domain::{PermissionSet, Resource, Role};
use serde::Serialize;
use ts_rs::TS;

use super::PermissionSetDto;

/// Effective permission of a role on a resource after inheritance.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-permission-response.ts"
)]
pub struct EffectivePermissionResponse {
    pub role: String,
    pub resource: String,
    pub permissions: PermissionSetDto,
    pub granted: Vec<String>,
}

impl EffectivePermissionResponse {
    pub fn new(role: Role, resource: Resource, permission_set: PermissionSet) -> Self {
        Self {
            role: role.as_str().to_owned(),
            resource: resource.as_str().to_owned(),
            permissions: permission_set.into(),
            granted: permission_set
                .granted()
                .into_iter()
                .map(|capability| capability.as_str().to_owned())
                .collect(),
        }
    }
}
