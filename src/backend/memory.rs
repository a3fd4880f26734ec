// ABOUTME: In-memory key-value backend for tests and single-process deployments
// ABOUTME: Mirrors the Redis string and set semantics behind shared RwLock state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::KeyValueBackend;
use crate::errors::StoreResult;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory backend implementation
///
/// Uses `Arc<RwLock<...>>` so clones share state, matching how a shared
/// Redis instance behaves across store handles. Set members are kept in a
/// `BTreeSet` so enumeration order is deterministic.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    strings: Arc<RwLock<HashMap<String, String>>>,
    sets: Arc<RwLock<HashMap<String, BTreeSet<String>>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.strings.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.strings
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        let mut strings = self.strings.write().await;
        let mut removed = 0;
        for key in keys {
            if strings.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        if self.strings.read().await.contains_key(key) {
            return Ok(true);
        }
        Ok(self.sets.read().await.contains_key(key))
    }

    async fn set_add(&self, set: &str, members: &[String]) -> StoreResult<()> {
        if members.is_empty() {
            return Ok(());
        }
        let mut sets = self.sets.write().await;
        let entry = sets.entry(set.to_owned()).or_default();
        for member in members {
            entry.insert(member.clone());
        }
        Ok(())
    }

    async fn set_remove(&self, set: &str, members: &[String]) -> StoreResult<()> {
        let mut sets = self.sets.write().await;
        if let Some(entry) = sets.get_mut(set) {
            for member in members {
                entry.remove(member);
            }
            // Redis drops a set once its last member is removed
            if entry.is_empty() {
                sets.remove(set);
            }
        }
        Ok(())
    }

    async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .sets
            .read()
            .await
            .get(set)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn multi_get(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        let strings = self.strings.read().await;
        Ok(keys.iter().map(|key| strings.get(key).cloned()).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        // In-memory backend is always reachable
        Ok(())
    }
}
