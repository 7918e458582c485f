use hrgate_domain::RoleLevel;
use serde::Serialize;
use ts_rs::TS;

/// Catalog role with its seniority level.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-level-response.ts"
)]
pub struct RoleLevelResponse {
    pub role: String,
    pub level: u8,
}

impl From<RoleLevel> for RoleLevelResponse {
    fn from(value: RoleLevel) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            level: value.level,
        }
    }
}
