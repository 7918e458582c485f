use hrgate_application::{
    AccessResolutionService, PermissionMatrixService, RoleInheritanceService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_resolution_service: AccessResolutionService,
    pub permission_matrix_service: PermissionMatrixService,
    pub role_inheritance_service: RoleInheritanceService,
    pub storage_backend: &'static str,
    pub cache_backend: &'static str,
}
