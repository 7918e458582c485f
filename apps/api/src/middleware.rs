use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use hrgate_core::{AppError, AppResult, CallerIdentity};
use hrgate_domain::Role;
use tracing::warn;

use crate::error::ApiResult;

pub const CALLER_SUBJECT_HEADER: &str = "x-caller-subject";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Turns the gateway headers into a [`CallerIdentity`] request extension.
pub async fn require_caller(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = caller_identity_from_headers(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Restricts a route group to callers acting as `admin`.
pub async fn require_admin(request: Request, next: Next) -> ApiResult<Response> {
    let identity = match request.extensions().get::<CallerIdentity>() {
        Some(identity) => identity.clone(),
        None => caller_identity_from_headers(request.headers())?,
    };
    ensure_admin(&identity)?;

    Ok(next.run(request).await)
}

pub fn caller_identity_from_headers(headers: &HeaderMap) -> AppResult<CallerIdentity> {
    match (
        header_value(headers, CALLER_SUBJECT_HEADER),
        header_value(headers, CALLER_ROLE_HEADER),
    ) {
        (Some(subject), Some(role_name)) => Ok(CallerIdentity::new(subject, role_name)),
        _ => Err(AppError::Unauthorized(
            "caller subject and role headers are required".to_owned(),
        )),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &'static str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub fn ensure_admin(identity: &CallerIdentity) -> AppResult<()> {
    if identity.role_name() == Role::Admin.as_str() {
        return Ok(());
    }

    warn!(
        subject = identity.subject(),
        role = identity.role_name(),
        "administrative request denied"
    );
    Err(AppError::Forbidden(format!(
        "role '{}' may not administer access control",
        identity.role_name()
    )))
}
