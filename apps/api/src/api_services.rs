mod database;
mod redis;
mod seed;
mod state_builder;

pub use database::connect_and_migrate;
pub use seed::seed_defaults;
pub use state_builder::{EngineAdapters, build_adapters, build_app_state};
