use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use hrgate_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers::{access, catalog, health, inheritance, permissions};
use crate::middleware;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let admin_routes = Router::new()
        .route(
            "/api/admin/catalog/roles",
            get(catalog::list_catalog_roles_handler),
        )
        .route(
            "/api/admin/catalog/resources",
            get(catalog::list_catalog_resources_handler),
        )
        .route(
            "/api/admin/permissions",
            get(permissions::list_permissions_handler)
                .post(permissions::create_permission_handler),
        )
        .route(
            "/api/admin/permissions/lookup",
            get(permissions::lookup_permission_handler),
        )
        .route(
            "/api/admin/permissions/{permission_id}",
            get(permissions::get_permission_handler)
                .put(permissions::update_permission_handler)
                .delete(permissions::delete_permission_handler),
        )
        .route(
            "/api/admin/role-inheritance",
            get(inheritance::list_role_inheritance_handler)
                .post(inheritance::create_role_inheritance_handler),
        )
        .route(
            "/api/admin/role-inheritance/hierarchy",
            get(inheritance::role_hierarchy_handler),
        )
        .route(
            "/api/admin/role-inheritance/resolve/{role}",
            get(inheritance::resolve_role_handler),
        )
        .route(
            "/api/admin/role-inheritance/{inheritance_id}",
            get(inheritance::get_role_inheritance_handler)
                .put(inheritance::update_role_inheritance_handler)
                .delete(inheritance::delete_role_inheritance_handler),
        )
        .route_layer(from_fn(middleware::require_admin));

    let caller_routes = Router::new()
        .route(
            "/api/access/roles/{role}/resources/{resource}",
            get(access::effective_permission_handler),
        )
        .merge(admin_routes)
        .route_layer(from_fn(middleware::require_caller));

    Ok(Router::new()
        .route("/health", get(health::health_handler))
        .merge(caller_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
