use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use hrgate_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_REDIS_CACHE_KEY_PREFIX: &str = "hrgate:resolution";
const DEFAULT_REDIS_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Where the permission matrix and inheritance graph are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

impl StorageBackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Which resolution cache backs the read path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionCacheBackend {
    InMemory,
    Redis {
        redis_url: String,
        key_prefix: String,
        ttl_seconds: u64,
    },
    Disabled,
}

impl ResolutionCacheBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Redis { .. } => "redis",
            Self::Disabled => "none",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub storage: StorageBackendConfig,
    pub cache: ResolutionCacheBackend,
    pub seed_defaults: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str, context: &str| {
            optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required {context}")))
        };

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3101);
        let frontend_url =
            optional("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let storage = match optional("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StorageBackendConfig::Postgres {
                database_url: required("DATABASE_URL", "when STORAGE_BACKEND=postgres")?,
                max_connections: optional("DATABASE_MAX_CONNECTIONS")
                    .map(|value| {
                        value.parse::<u32>().map_err(|error| {
                            AppError::Validation(format!(
                                "invalid DATABASE_MAX_CONNECTIONS '{value}': {error}"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            },
            "memory" => StorageBackendConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let cache = match optional("CACHE_BACKEND")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => ResolutionCacheBackend::InMemory,
            "none" => ResolutionCacheBackend::Disabled,
            "redis" => {
                let ttl_seconds = match optional("REDIS_CACHE_TTL_SECONDS") {
                    Some(value) => value.parse::<u64>().map_err(|error| {
                        AppError::Validation(format!(
                            "invalid REDIS_CACHE_TTL_SECONDS '{value}': {error}"
                        ))
                    })?,
                    None => DEFAULT_REDIS_CACHE_TTL_SECONDS,
                };
                if ttl_seconds == 0 {
                    return Err(AppError::Validation(
                        "REDIS_CACHE_TTL_SECONDS must be greater than zero".to_owned(),
                    ));
                }

                ResolutionCacheBackend::Redis {
                    redis_url: required("REDIS_URL", "when CACHE_BACKEND=redis")?,
                    key_prefix: optional("REDIS_CACHE_KEY_PREFIX")
                        .unwrap_or_else(|| DEFAULT_REDIS_CACHE_KEY_PREFIX.to_owned()),
                    ttl_seconds,
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "CACHE_BACKEND must be one of 'memory', 'redis' or 'none', got '{other}'"
                )));
            }
        };

        let seed_defaults = optional("SEED_DEFAULTS")
            .map(|value| !value.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            frontend_url,
            storage,
            cache,
            seed_defaults,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
