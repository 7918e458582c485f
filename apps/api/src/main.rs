//! hrgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use hrgate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackendConfig, init_tracing};
use crate::api_services::{build_adapters, build_app_state, connect_and_migrate, seed_defaults};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = match &config.storage {
        StorageBackendConfig::Postgres {
            database_url,
            max_connections,
        } => Some(connect_and_migrate(database_url, *max_connections).await?),
        StorageBackendConfig::Memory => None,
    };

    if config.migrate_only {
        if pool.is_none() {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state(build_adapters(&config, pool)?);
    if config.seed_defaults {
        seed_defaults(&app_state).await?;
    }

    info!(
        storage = config.storage.name(),
        cache = config.cache.name(),
        "permission engine ready"
    );

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "hrgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
