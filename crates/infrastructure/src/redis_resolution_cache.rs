//! Redis-backed resolution cache shared by every API process.

use async_trait::async_trait;
use hrgate_application::{CacheGeneration, ResolutionCache};
use hrgate_core::{AppError, AppResult};
use hrgate_domain::{PermissionSet, Resource, Role, RoleClosure};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Redis implementation of the resolution cache port.
///
/// Entries are stored under generation-scoped keys. Invalidation increments
/// the shared generation counter, which orphans every older key until its
/// TTL runs out, so all processes observe the invalidation at once.
#[derive(Clone)]
pub struct RedisResolutionCache {
    client: redis::Client,
    key_prefix: String,
    ttl_seconds: u64,
}

impl RedisResolutionCache {
    /// Creates a cache adapter with a configured Redis client, key prefix and
    /// entry TTL.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
            ttl_seconds,
        }
    }

    fn generation_key(&self) -> String {
        format!("{}:generation", self.key_prefix)
    }

    fn closure_key(&self, generation: CacheGeneration, role: Role) -> String {
        format!("{}:g{generation}:closure:{role}", self.key_prefix)
    }

    fn effective_key(&self, generation: CacheGeneration, role: Role, resource: Resource) -> String {
        format!(
            "{}:g{generation}:effective:{role}:{resource}",
            self.key_prefix
        )
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }

    async fn read_generation(
        connection: &mut MultiplexedConnection,
        key: &str,
    ) -> AppResult<CacheGeneration> {
        let generation: Option<CacheGeneration> = connection.get(key).await.map_err(|error| {
            AppError::Internal(format!("failed to read resolution cache generation: {error}"))
        })?;

        Ok(generation.unwrap_or(0))
    }

    async fn read_entry(
        &self,
        key_for: impl FnOnce(CacheGeneration) -> String + Send,
    ) -> AppResult<Option<String>> {
        let mut connection = self.connection().await?;
        let generation = Self::read_generation(&mut connection, &self.generation_key()).await?;

        connection
            .get(key_for(generation))
            .await
            .map_err(|error| AppError::Internal(format!("failed to read resolution cache entry: {error}")))
    }

    async fn write_entry(&self, key: String, value: String) -> AppResult<()> {
        let mut connection = self.connection().await?;

        connection
            .set_ex::<_, _, ()>(key, value, self.ttl_seconds)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write resolution cache entry: {error}"
                ))
            })
    }
}

#[async_trait]
impl ResolutionCache for RedisResolutionCache {
    async fn generation(&self) -> AppResult<CacheGeneration> {
        let mut connection = self.connection().await?;
        Self::read_generation(&mut connection, &self.generation_key()).await
    }

    async fn get_closure(&self, role: Role) -> AppResult<Option<RoleClosure>> {
        let encoded = self
            .read_entry(|generation| self.closure_key(generation, role))
            .await?;

        encoded.as_deref().map(decode_entry).transpose()
    }

    // Keys embed the generation, so a population computed under a stale
    // generation lands on a key no reader looks up anymore.
    async fn put_closure(&self, generation: CacheGeneration, closure: RoleClosure) -> AppResult<()> {
        let key = self.closure_key(generation, closure.root());
        self.write_entry(key, encode_entry(&closure)?).await
    }

    async fn get_effective_permission(
        &self,
        role: Role,
        resource: Resource,
    ) -> AppResult<Option<PermissionSet>> {
        let encoded = self
            .read_entry(|generation| self.effective_key(generation, role, resource))
            .await?;

        encoded.as_deref().map(decode_entry).transpose()
    }

    async fn put_effective_permission(
        &self,
        generation: CacheGeneration,
        role: Role,
        resource: Resource,
        permission_set: PermissionSet,
    ) -> AppResult<()> {
        let key = self.effective_key(generation, role, resource);
        self.write_entry(key, encode_entry(&permission_set)?).await
    }

    async fn invalidate_all(&self) -> AppResult<CacheGeneration> {
        let mut connection = self.connection().await?;

        connection
            .incr(self.generation_key(), 1_u64)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to advance resolution cache generation: {error}"
                ))
            })
    }
}

fn encode_entry<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|error| {
        AppError::Internal(format!("failed to encode resolution cache entry: {error}"))
    })
}

fn decode_entry<T: serde::de::DeserializeOwned>(value: &str) -> AppResult<T> {
    serde_json::from_str(value).map_err(|error| {
        AppError::Internal(format!(
            "invalid resolution cache entry '{value}': {error}"
        ))
    })
}
