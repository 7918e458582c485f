use axum::Json;
use axum::extract::{Extension, Path, State};
use hrgate_core::CallerIdentity;
use hrgate_domain::{Resource, Role};
use tracing::debug;

use crate::dto::EffectivePermissionResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn effective_permission_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path((role, resource)): Path<(String, String)>,
) -> ApiResult<Json<EffectivePermissionResponse>> {
    let role = Role::from_transport(role.as_str())?;
    let resource = Resource::from_transport(resource.as_str())?;

    let permission_set = state
        .access_resolution_service
        .effective_permission(role, resource)
        .await?;
    debug!(subject = caller.subject(), %role, %resource, "effective permission served");

    Ok(Json(EffectivePermissionResponse::new(
        role,
        resource,
        permission_set,
    )))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Extension, Path, State};
    use hrgate_core::CallerIdentity;

    use super::effective_permission_handler;
    use crate::error::ApiError;
    use crate::handlers::test_support::seeded_state;
    use hrgate_core::AppError;

    fn caller() -> Extension<CallerIdentity> {
        Extension(CallerIdentity::new("gateway-user", "employee"))
    }

    #[tokio::test]
    async fn seeded_admin_has_full_rights() {
        let state = seeded_state().await;

        let response = effective_permission_handler(
            State(state),
            caller(),
            Path(("admin".to_owned(), "configuration".to_owned())),
        )
        .await;
        let Ok(response) = response else {
            panic!("effective permission should resolve");
        };

        assert_eq!(response.0.granted.len(), 6);
        assert!(response.0.permissions.approve);
    }

    #[tokio::test]
    async fn unknown_names_are_validation_errors() {
        let state = seeded_state().await;

        let unknown_role = effective_permission_handler(
            State(state.clone()),
            caller(),
            Path(("intern".to_owned(), "payroll".to_owned())),
        )
        .await;
        assert!(matches!(unknown_role, Err(ApiError(AppError::Validation(_)))));

        let unknown_resource = effective_permission_handler(
            State(state),
            caller(),
            Path(("hr".to_owned(), "vault".to_owned())),
        )
        .await;
        assert!(matches!(
            unknown_resource,
            Err(ApiError(AppError::Validation(_)))
        ));
    }
}
