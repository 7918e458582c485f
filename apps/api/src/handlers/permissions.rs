use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use hrgate_application::{CreatePermissionInput, UpdatePermissionInput};
use hrgate_core::{AppError, CallerIdentity};
use hrgate_domain::{PermissionId, Resource, Role};

use crate::dto::{CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PermissionListQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionLookupQuery {
    pub role: String,
    pub resource: String,
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Query(query): Query<PermissionListQuery>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let role = query
        .role
        .as_deref()
        .map(Role::from_transport)
        .transpose()?;

    let permissions = state
        .permission_matrix_service
        .list_permissions(role)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn lookup_permission_handler(
    State(state): State<AppState>,
    Query(query): Query<PermissionLookupQuery>,
) -> ApiResult<Json<PermissionResponse>> {
    let role = Role::from_transport(query.role.as_str())?;
    let resource = Resource::from_transport(query.resource.as_str())?;

    let permission = state
        .permission_matrix_service
        .find_by_role_resource(role, resource)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no permission row for role '{role}' on resource '{resource}'"
            ))
        })?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_matrix_service
        .get_permission(PermissionId::parse(permission_id.as_str())?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let input = CreatePermissionInput {
        role: Role::from_transport(payload.role.as_str())?,
        resource: Resource::from_transport(payload.resource.as_str())?,
        capabilities: payload.permissions.into(),
        description: payload.description,
        is_protected: payload.is_protected,
    };

    let permission = state
        .permission_matrix_service
        .create_permission(&caller, input)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(permission_id): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_matrix_service
        .update_permission(
            &caller,
            PermissionId::parse(permission_id.as_str())?,
            UpdatePermissionInput {
                description: payload.description,
                is_active: payload.is_active,
                capabilities: payload.permissions.map(Into::into),
                is_protected: payload.is_protected,
            },
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .permission_matrix_service
        .delete_permission(&caller, PermissionId::parse(permission_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
