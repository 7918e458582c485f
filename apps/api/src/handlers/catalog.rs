use axum::Json;
use hrgate_domain::{all_resources, all_roles};

use crate::dto::RoleLevelResponse;

pub async fn list_catalog_roles_handler() -> Json<Vec<RoleLevelResponse>> {
    Json(all_roles().into_iter().map(RoleLevelResponse::from).collect())
}

pub async fn list_catalog_resources_handler() -> Json<Vec<String>> {
    Json(
        all_resources()
            .into_iter()
            .map(|resource| resource.as_str().to_owned())
            .collect(),
    )
}
