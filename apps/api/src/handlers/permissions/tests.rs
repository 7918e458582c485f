use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hrgate_core::AppError;

use super::{
    PermissionListQuery, PermissionLookupQuery, create_permission_handler,
    delete_permission_handler, get_permission_handler, list_permissions_handler,
    lookup_permission_handler, update_permission_handler,
};
use crate::dto::{CreatePermissionRequest, PermissionSetDto, UpdatePermissionRequest};
use crate::error::ApiError;
use crate::handlers::access::effective_permission_handler;
use crate::handlers::test_support::{admin, empty_state, seeded_state};

fn view_only() -> PermissionSetDto {
    PermissionSetDto {
        view: true,
        ..PermissionSetDto::default()
    }
}

fn create_request(role: &str, resource: &str) -> Json<CreatePermissionRequest> {
    Json(CreatePermissionRequest {
        role: role.to_owned(),
        resource: resource.to_owned(),
        permissions: view_only(),
        description: "created from handler test".to_owned(),
        is_protected: false,
    })
}

#[tokio::test]
async fn create_then_lookup_and_get() {
    let state = empty_state();

    let created =
        create_permission_handler(State(state.clone()), admin(), create_request("hr", "payroll"))
            .await;
    let Ok((status, Json(created))) = created else {
        panic!("permission should be created");
    };
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.permissions.view);
    assert!(!created.is_protected);

    let looked_up = lookup_permission_handler(
        State(state.clone()),
        Query(PermissionLookupQuery {
            role: "hr".to_owned(),
            resource: "payroll".to_owned(),
        }),
    )
    .await;
    assert_eq!(looked_up.ok().map(|json| json.0.id), Some(created.id.clone()));

    let fetched = get_permission_handler(State(state), Path(created.id.clone())).await;
    assert_eq!(
        fetched.ok().map(|json| json.0.description),
        Some("created from handler test".to_owned())
    );
}

#[tokio::test]
async fn duplicate_create_is_conflict() {
    let state = empty_state();
    assert!(
        create_permission_handler(State(state.clone()), admin(), create_request("hr", "payroll"))
            .await
            .is_ok()
    );

    let duplicate =
        create_permission_handler(State(state), admin(), create_request("hr", "payroll")).await;
    assert!(matches!(duplicate, Err(ApiError(AppError::Conflict(_)))));
}

#[tokio::test]
async fn unknown_role_and_bad_ids_are_rejected() {
    let state = empty_state();

    let unknown_role =
        create_permission_handler(State(state.clone()), admin(), create_request("intern", "payroll"))
            .await;
    assert!(matches!(unknown_role, Err(ApiError(AppError::Validation(_)))));

    let bad_id = get_permission_handler(State(state.clone()), Path("not-a-uuid".to_owned())).await;
    assert!(matches!(bad_id, Err(ApiError(AppError::Validation(_)))));

    let missing = lookup_permission_handler(
        State(state),
        Query(PermissionLookupQuery {
            role: "hr".to_owned(),
            resource: "payroll".to_owned(),
        }),
    )
    .await;
    assert!(matches!(missing, Err(ApiError(AppError::NotFound(_)))));
}

#[tokio::test]
async fn update_is_visible_through_access_endpoint() {
    let state = empty_state();
    let Ok((_, Json(created))) =
        create_permission_handler(State(state.clone()), admin(), create_request("hr", "reports"))
            .await
    else {
        panic!("permission should be created");
    };

    let access = || {
        effective_permission_handler(
            State(state.clone()),
            admin(),
            Path(("hr".to_owned(), "reports".to_owned())),
        )
    };
    assert!(access().await.is_ok_and(|json| !json.0.permissions.export));

    let updated = update_permission_handler(
        State(state.clone()),
        admin(),
        Path(created.id.clone()),
        Json(UpdatePermissionRequest {
            permissions: Some(PermissionSetDto {
                view: true,
                export: true,
                ..PermissionSetDto::default()
            }),
            ..UpdatePermissionRequest::default()
        }),
    )
    .await;
    assert!(updated.is_ok());
    assert!(access().await.is_ok_and(|json| json.0.permissions.export));

    let empty = update_permission_handler(
        State(state.clone()),
        admin(),
        Path(created.id.clone()),
        Json(UpdatePermissionRequest::default()),
    )
    .await;
    assert!(matches!(empty, Err(ApiError(AppError::Validation(_)))));

    let deleted = delete_permission_handler(State(state.clone()), admin(), Path(created.id)).await;
    assert_eq!(deleted.ok(), Some(StatusCode::NO_CONTENT));
    assert!(access().await.is_ok_and(|json| json.0.granted.is_empty()));
}

#[tokio::test]
async fn seeded_rows_are_listed_and_protected() {
    let state = seeded_state().await;

    let listed = list_permissions_handler(
        State(state.clone()),
        Query(PermissionListQuery {
            role: Some("admin".to_owned()),
        }),
    )
    .await;
    let Ok(Json(listed)) = listed else {
        panic!("permissions should be listed");
    };
    assert_eq!(listed.len(), 12);
    assert!(listed.iter().all(|row| row.role == "admin" && row.is_protected));

    let deleted = delete_permission_handler(State(state), admin(), Path(listed[0].id.clone())).await;
    assert!(matches!(deleted, Err(ApiError(AppError::Conflict(_)))));
}
