// ABOUTME: Key-value backend abstraction for configuration storage
// ABOUTME: Pluggable backend support (Redis, in-memory) with URL-based selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Key-value backend abstraction
//!
//! The store depends on a narrow key-value surface: string get/set, variadic
//! delete, existence probe, set membership for the secondary index, and an
//! order-preserving multi-get. [`Backend`] wraps the available
//! implementations and selects one from the backend URL scheme, so the
//! embedding application can swap Redis for the in-process backend without
//! touching store code.

/// In-memory backend implementation
pub mod memory;
/// Redis backend implementation
pub mod redis;

use crate::config::RedisConnectionConfig;
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use tracing::{debug, info};

pub use memory::MemoryBackend;
pub use redis::RedisBackend;

/// Key-value backend surface consumed by the configuration store
///
/// `multi_get` must return exactly one slot per requested key, in request
/// order. Set operations back the secondary index of live keys.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the given keys, returning how many existed
    async fn delete(&self, keys: &[String]) -> StoreResult<u64>;

    /// Whether a value is stored under `key`
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Add members to the named set
    async fn set_add(&self, set: &str, members: &[String]) -> StoreResult<()>;

    /// Remove members from the named set
    async fn set_remove(&self, set: &str, members: &[String]) -> StoreResult<()>;

    /// All members of the named set (empty if the set does not exist)
    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>>;

    /// Fetch multiple keys in one round trip, one optional result per key,
    /// order-preserving
    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>>;

    /// Verify the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Supported backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Redis,
    Memory,
}

/// Backend instance wrapper that delegates to the appropriate implementation
#[derive(Clone)]
pub enum Backend {
    Redis(RedisBackend),
    Memory(MemoryBackend),
}

impl Backend {
    /// Create a new backend instance based on the URL scheme
    ///
    /// `redis://` and `rediss://` select Redis; `memory://` selects the
    /// in-process backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or the Redis
    /// connection cannot be established.
    pub async fn new(url: &str, redis_config: &RedisConnectionConfig) -> StoreResult<Self> {
        debug!("Detecting backend type from URL: {}", url);
        let backend_type = detect_backend_type(url)?;
        info!("Detected backend type: {:?}", backend_type);

        match backend_type {
            BackendType::Redis => {
                let backend = RedisBackend::new(url, redis_config).await?;
                Ok(Self::Redis(backend))
            }
            BackendType::Memory => Ok(Self::Memory(MemoryBackend::new())),
        }
    }

    /// Get a descriptive string for the current backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Redis(_) => "Redis (Distributed)",
            Self::Memory(_) => "In-Memory (Single Process)",
        }
    }

    /// Get the backend type enum
    #[must_use]
    pub const fn backend_type(&self) -> BackendType {
        match self {
            Self::Redis(_) => BackendType::Redis,
            Self::Memory(_) => BackendType::Memory,
        }
    }
}

/// Detect backend type from a URL scheme
fn detect_backend_type(url: &str) -> StoreResult<BackendType> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        Ok(BackendType::Redis)
    } else if url.starts_with("memory://") {
        Ok(BackendType::Memory)
    } else {
        Err(StoreError::config(format!(
            "unsupported backend URL '{url}': expected redis://, rediss://, or memory://"
        )))
    }
}

#[async_trait]
impl KeyValueBackend for Backend {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Self::Redis(b) => b.get(key).await,
            Self::Memory(b) => b.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            Self::Redis(b) => b.set(key, value).await,
            Self::Memory(b) => b.set(key, value).await,
        }
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        match self {
            Self::Redis(b) => b.delete(keys).await,
            Self::Memory(b) => b.delete(keys).await,
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        match self {
            Self::Redis(b) => b.exists(key).await,
            Self::Memory(b) => b.exists(key).await,
        }
    }

    async fn set_add(&self, set: &str, members: &[String]) -> StoreResult<()> {
        match self {
            Self::Redis(b) => b.set_add(set, members).await,
            Self::Memory(b) => b.set_add(set, members).await,
        }
    }

    async fn set_remove(&self, set: &str, members: &[String]) -> StoreResult<()> {
        match self {
            Self::Redis(b) => b.set_remove(set, members).await,
            Self::Memory(b) => b.set_remove(set, members).await,
        }
    }

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
        match self {
            Self::Redis(b) => b.set_members(set).await,
            Self::Memory(b) => b.set_members(set).await,
        }
    }

    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        match self {
            Self::Redis(b) => b.multi_get(keys).await,
            Self::Memory(b) => b.multi_get(keys).await,
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match self {
            Self::Redis(b) => b.ping().await,
            Self::Memory(b) => b.ping().await,
        }
    }
}
