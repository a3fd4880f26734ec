// ABOUTME: Redis key-value backend with connection manager and retry support
// ABOUTME: Provides distributed storage for multi-instance deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::KeyValueBackend;
use crate::config::RedisConnectionConfig;
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{error, info, warn};

/// Redis backend implementation
///
/// Uses Redis `ConnectionManager` for automatic reconnection and connection
/// pooling. All failures surface as `BackendUnavailable` so the store's
/// error contract stays backend-agnostic.
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Create a new Redis backend
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis connection cannot be established within
    /// the configured retry budget.
    pub async fn new(url: &str, config: &RedisConnectionConfig) -> StoreResult<Self> {
        info!(
            "Connecting to Redis at {} (timeout={}s, response_timeout={}s, retries={})",
            url,
            config.connection_timeout_secs,
            config.response_timeout_secs,
            config.initial_connection_retries
        );

        let client = redis::Client::open(url)
            .map_err(|e| StoreError::backend(format!("Failed to create Redis client: {e}")))?;

        let manager = Self::connect_with_retry(&client, config).await?;

        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }

    /// Connect to Redis with exponential backoff retry on failure
    ///
    /// Uses `ConnectionManagerConfig` to configure timeouts and reconnection
    /// behavior after the initial connection is established.
    async fn connect_with_retry(
        client: &redis::Client,
        config: &RedisConnectionConfig,
    ) -> StoreResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(config.response_timeout_secs))
            .set_number_of_retries(config.reconnection_retries)
            .set_exponent_base(config.retry_exponent_base)
            .set_max_delay(config.max_retry_delay_ms);

        let max_retries = config.initial_connection_retries;
        let max_delay_ms = config.max_retry_delay_ms;

        let mut last_error = None;
        let mut delay_ms = config.initial_retry_delay_ms;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    last_error = Some(e);

                    if attempt < max_retries {
                        warn!(
                            "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms,
                            last_error
                                .as_ref()
                                .map_or_else(|| "unknown".to_owned(), ToString::to_string)
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        // Exponential backoff with cap
                        delay_ms = (delay_ms * 2).min(max_delay_ms);
                    }
                }
            }
        }

        Err(StoreError::backend(format!(
            "Failed to connect to Redis after {} retries: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.manager.clone();

        let value: Option<String> = conn.get(key).await.map_err(|e| {
            error!("Redis GET operation failed: {}", e);
            StoreError::backend(format!("Redis GET failed: {e}"))
        })?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.manager.clone();

        conn.set::<_, _, ()>(key, value).await.map_err(|e| {
            error!("Redis SET operation failed: {}", e);
            StoreError::backend(format!("Redis SET failed: {e}"))
        })?;

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.manager.clone();

        let removed: u64 = conn.del(keys).await.map_err(|e| {
            error!("Redis DEL operation failed: {}", e);
            StoreError::backend(format!("Redis DEL failed: {e}"))
        })?;

        Ok(removed)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.manager.clone();

        let exists: bool = conn.exists(key).await.map_err(|e| {
            error!("Redis EXISTS operation failed: {}", e);
            StoreError::backend(format!("Redis EXISTS failed: {e}"))
        })?;

        Ok(exists)
    }

    async fn set_add(&self, set: &str, members: &[String]) -> StoreResult<()> {
        if members.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();

        conn.sadd::<_, _, ()>(set, members).await.map_err(|e| {
            error!("Redis SADD operation failed: {}", e);
            StoreError::backend(format!("Redis SADD failed: {e}"))
        })?;

        Ok(())
    }

    async fn set_remove(&self, set: &str, members: &[String]) -> StoreResult<()> {
        if members.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();

        conn.srem::<_, _, ()>(set, members).await.map_err(|e| {
            error!("Redis SREM operation failed: {}", e);
            StoreError::backend(format!("Redis SREM failed: {e}"))
        })?;

        Ok(())
    }

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.manager.clone();

        let members: Vec<String> = conn.smembers(set).await.map_err(|e| {
            error!("Redis SMEMBERS operation failed: {}", e);
            StoreError::backend(format!("Redis SMEMBERS failed: {e}"))
        })?;

        Ok(members)
    }

    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.manager.clone();

        // MGET keeps request order and yields one nil-able slot per key
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis MGET operation failed: {}", e);
                StoreError::backend(format!("Redis MGET failed: {e}"))
            })?;

        Ok(values)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis PING failed: {}", e);
                StoreError::backend(format!("Redis PING failed: {e}"))
            })?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(StoreError::backend(format!(
                "unexpected PING response '{response}'"
            )))
        }
    }
}
