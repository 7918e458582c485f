use std::sync::Arc;

use axum::extract::Extension;
use hrgate_core::CallerIdentity;
use hrgate_infrastructure::InMemoryResolutionCache;

use crate::api_services::{EngineAdapters, build_app_state, seed_defaults};
use crate::state::AppState;

pub fn empty_state() -> AppState {
    build_app_state(EngineAdapters::in_memory(
        Arc::new(InMemoryResolutionCache::new()),
        "memory",
    ))
}

pub async fn seeded_state() -> AppState {
    let state = empty_state();
    if let Err(error) = seed_defaults(&state).await {
        panic!("default seeding should succeed: {error}");
    }
    state
}

pub fn admin() -> Extension<CallerIdentity> {
    Extension(CallerIdentity::new("admin@example.com", "admin"))
}
