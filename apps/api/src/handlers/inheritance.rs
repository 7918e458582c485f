use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use hrgate_application::{CreateRoleInheritanceInput, UpdateRoleInheritanceInput};
use hrgate_core::CallerIdentity;
use hrgate_domain::{InheritanceId, InheritancePriority, Role};

use crate::dto::{
    CreateRoleInheritanceRequest, RoleClosureResponse, RoleHierarchyEntryResponse,
    RoleInheritanceResponse, UpdateRoleInheritanceRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_role_inheritance_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleInheritanceResponse>>> {
    let edges = state
        .role_inheritance_service
        .list_inheritance()
        .await?
        .into_iter()
        .map(RoleInheritanceResponse::from)
        .collect();

    Ok(Json(edges))
}

pub async fn get_role_inheritance_handler(
    State(state): State<AppState>,
    Path(inheritance_id): Path<String>,
) -> ApiResult<Json<RoleInheritanceResponse>> {
    let edge = state
        .role_inheritance_service
        .get_inheritance(InheritanceId::parse(inheritance_id.as_str())?)
        .await?;

    Ok(Json(RoleInheritanceResponse::from(edge)))
}

pub async fn create_role_inheritance_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<CreateRoleInheritanceRequest>,
) -> ApiResult<(StatusCode, Json<RoleInheritanceResponse>)> {
    let input = CreateRoleInheritanceInput {
        child_role: Role::from_transport(payload.child_role.as_str())?,
        parent_role: Role::from_transport(payload.parent_role.as_str())?,
        priority: payload
            .priority
            .map(InheritancePriority::new)
            .transpose()?
            .unwrap_or_default(),
        notes: payload.notes,
    };

    let edge = state
        .role_inheritance_service
        .create_inheritance(&caller, input)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleInheritanceResponse::from(edge))))
}

pub async fn update_role_inheritance_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(inheritance_id): Path<String>,
    Json(payload): Json<UpdateRoleInheritanceRequest>,
) -> ApiResult<Json<RoleInheritanceResponse>> {
    let input = UpdateRoleInheritanceInput {
        is_active: payload.is_active,
        priority: payload
            .priority
            .map(InheritancePriority::new)
            .transpose()?,
        notes: payload.notes,
    };

    let edge = state
        .role_inheritance_service
        .update_inheritance(&caller, InheritanceId::parse(inheritance_id.as_str())?, input)
        .await?;

    Ok(Json(RoleInheritanceResponse::from(edge)))
}

pub async fn delete_role_inheritance_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(inheritance_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_inheritance_service
        .delete_inheritance(&caller, InheritanceId::parse(inheritance_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn role_hierarchy_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleHierarchyEntryResponse>>> {
    let hierarchy = state
        .role_inheritance_service
        .hierarchy()
        .await?
        .into_iter()
        .map(|(role, parents)| RoleHierarchyEntryResponse::new(role, parents))
        .collect();

    Ok(Json(hierarchy))
}

pub async fn resolve_role_handler(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> ApiResult<Json<RoleClosureResponse>> {
    let closure = state
        .role_inheritance_service
        .resolve(Role::from_transport(role.as_str())?)
        .await?;

    Ok(Json(RoleClosureResponse::from(closure)))
}
