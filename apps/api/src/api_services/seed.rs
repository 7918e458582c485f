use hrgate_core::{AppResult, CallerIdentity};
use hrgate_domain::Role;
use tracing::info;

use crate::state::AppState;

const SEED_SUBJECT: &str = "system:seed";

/// Seeds the default permission matrix and inheritance edges when absent.
pub async fn seed_defaults(state: &AppState) -> AppResult<()> {
    let actor = CallerIdentity::new(SEED_SUBJECT, Role::Admin.as_str());

    let permissions = state.permission_matrix_service.seed_defaults(&actor).await?;
    let edges = state.role_inheritance_service.seed_defaults(&actor).await?;

    info!(permissions, edges, "startup seeding finished");
    Ok(())
}
