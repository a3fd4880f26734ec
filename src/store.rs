// ABOUTME: The configuration store service with CRUD, search, and batch operations
// ABOUTME: Keeps the primary records and the secondary key index in lock-step
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration store
//!
//! [`ConfigStore`] owns the mapping from configuration key to entry. Each
//! entry persists as one JSON record under `config:{key}`, and every live
//! key is additionally tracked in the `config:list` index set so listing
//! never scans the backend namespace.
//!
//! Invariant: a key appears in the index iff its record exists. Create adds
//! both; delete removes both (record first, so a crash mid-operation leaves
//! at worst a dangling index entry); update touches only the record. `list`
//! tolerates index/record drift by silently skipping dangling entries.
//!
//! The store holds no in-process state beyond the injected backend handle
//! and relies on the backend's per-key atomicity for concurrent callers.

use crate::backend::{Backend, KeyValueBackend};
use crate::constants::storage::{CONFIG_INDEX_KEY, CONFIG_KEY_PREFIX};
use crate::errors::{StoreError, StoreResult};
use crate::models::{
    now_millis, ConfigEntry, ConfigEntryView, CreateConfigRequest, UpdateConfigRequest, ValueType,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Pattern a configuration key must match: a letter followed by letters,
/// digits, dots, underscores, or hyphens
static KEY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").ok());

/// Whether `key` is a well-formed configuration key
fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.as_ref().is_some_and(|re| re.is_match(key))
}

/// The configuration store service
///
/// Stateless apart from the injected backend handle; cheap to clone and
/// share across tasks.
#[derive(Clone)]
pub struct ConfigStore {
    backend: Backend,
}

impl ConfigStore {
    /// Create a store over the given backend
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// The backend this store operates on
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Namespaced record key for a configuration key
    fn record_key(key: &str) -> String {
        format!("{CONFIG_KEY_PREFIX}{key}")
    }

    /// Create a new configuration entry
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed key, an empty value, or a
    /// non-JSON value declared as `json`; `AlreadyExists` if the key is
    /// live; `BackendUnavailable` on backend faults.
    pub async fn create(&self, request: CreateConfigRequest) -> StoreResult<ConfigEntryView> {
        validate_create(&request)?;

        let record_key = Self::record_key(&request.key);
        if self.backend.exists(&record_key).await? {
            return Err(StoreError::already_exists(&request.key));
        }

        let now = now_millis();
        let entry = ConfigEntry {
            key: request.key,
            value: request.value,
            value_type: request.value_type,
            description: request.description,
            tags: request.tags,
            created_at: now,
            updated_at: now,
        };

        let payload = serde_json::to_string(&entry)
            .map_err(|e| StoreError::serialization(format!("Failed to serialize entry: {e}")))?;

        // Record first, then index membership; a crash in between leaves a
        // ghost-free store (the key is simply not listed yet)
        self.backend.set(&record_key, &payload).await?;
        self.backend
            .set_add(CONFIG_INDEX_KEY, std::slice::from_ref(&entry.key))
            .await?;

        info!("Created configuration '{}' ({})", entry.key, entry.value_type);

        Ok(ConfigEntryView::from_entry(entry))
    }

    /// Fetch a single configuration entry
    ///
    /// Absence is `None`, not an error. Key existence is determined solely
    /// by record presence; the index is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` on backend faults, or a serialization
    /// error if the stored record is unreadable.
    pub async fn get(&self, key: &str) -> StoreResult<Option<ConfigEntryView>> {
        let payload = self.backend.get(&Self::record_key(key)).await?;

        match payload {
            Some(payload) => {
                let entry: ConfigEntry = serde_json::from_str(&payload).map_err(|e| {
                    StoreError::serialization(format!(
                        "Failed to deserialize entry for '{key}': {e}"
                    ))
                })?;
                Ok(Some(ConfigEntryView::from_entry(entry)))
            }
            None => Ok(None),
        }
    }

    /// List all configuration entries, most recently updated first
    ///
    /// Reads the index set and bulk-fetches all records in one round trip.
    /// An empty index short-circuits without touching the records. Index
    /// entries whose record is missing or unreadable are skipped.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` on backend faults.
    pub async fn list(&self) -> StoreResult<Vec<ConfigEntryView>> {
        let keys = self.backend.set_members(CONFIG_INDEX_KEY).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let record_keys: Vec<String> = keys.iter().map(|key| Self::record_key(key)).collect();
        let payloads = self.backend.multi_get(&record_keys).await?;

        let mut entries: Vec<ConfigEntry> = Vec::with_capacity(payloads.len());
        for (key, payload) in keys.iter().zip(payloads) {
            // Dangling index entry: tolerated, skipped
            let Some(payload) = payload else { continue };
            match serde_json::from_str::<ConfigEntry>(&payload) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping unreadable record for '{}': {}", key, e),
            }
        }

        // Stable sort keeps ties deterministic within a call
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        debug!("Listed {} configuration entries", entries.len());

        Ok(entries.into_iter().map(ConfigEntryView::from_entry).collect())
    }

    /// List all configuration entries grouped by key
    ///
    /// Each group holds a single entry given key uniqueness; the shape
    /// matches the grouped listing consumed by existing clients.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` on backend faults.
    pub async fn list_grouped(&self) -> StoreResult<BTreeMap<String, Vec<ConfigEntryView>>> {
        let mut grouped: BTreeMap<String, Vec<ConfigEntryView>> = BTreeMap::new();
        for entry in self.list().await? {
            grouped.entry(entry.key.clone()).or_default().push(entry);
        }
        Ok(grouped)
    }

    /// Update a configuration entry's value, description, and/or tags
    ///
    /// Omitted fields keep their prior value. `key`, `value_type`, and
    /// `created_at` never change; `updated_at` is stamped strictly greater
    /// than its previous value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists for `key`;
    /// `BackendUnavailable` on backend faults.
    pub async fn update(
        &self,
        key: &str,
        request: UpdateConfigRequest,
    ) -> StoreResult<ConfigEntryView> {
        let record_key = Self::record_key(key);
        let payload = self
            .backend
            .get(&record_key)
            .await?
            .ok_or_else(|| StoreError::not_found(key))?;

        let mut entry: ConfigEntry = serde_json::from_str(&payload).map_err(|e| {
            StoreError::serialization(format!("Failed to deserialize entry for '{key}': {e}"))
        })?;

        if let Some(value) = request.value {
            entry.value = value;
        }
        if let Some(description) = request.description {
            entry.description = Some(description);
        }
        if let Some(tags) = request.tags {
            entry.tags = Some(tags);
        }
        // Monotonic even when two updates land within one millisecond
        entry.updated_at = now_millis().max(entry.updated_at + 1);

        let payload = serde_json::to_string(&entry)
            .map_err(|e| StoreError::serialization(format!("Failed to serialize entry: {e}")))?;
        self.backend.set(&record_key, &payload).await?;

        info!("Updated configuration '{}'", entry.key);

        Ok(ConfigEntryView::from_entry(entry))
    }

    /// Delete a configuration entry
    ///
    /// The record is removed before its index membership: a crash between
    /// the two leaves a dangling index entry, which `list` tolerates,
    /// rather than a ghost record with no index trace.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist;
    /// `BackendUnavailable` on backend faults.
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        let record_key = Self::record_key(key);
        if !self.backend.exists(&record_key).await? {
            return Err(StoreError::not_found(key));
        }

        self.backend.delete(std::slice::from_ref(&record_key)).await?;
        self.backend
            .set_remove(CONFIG_INDEX_KEY, &[key.to_owned()])
            .await?;

        info!("Deleted configuration '{}'", key);

        Ok(())
    }

    /// Delete a batch of configuration entries
    ///
    /// No per-key existence check: one bulk record delete and one bulk
    /// index removal. Keys that never existed are ignored; an empty input
    /// is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` on backend faults.
    pub async fn batch_delete(&self, keys: &[String]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let record_keys: Vec<String> = keys.iter().map(|key| Self::record_key(key)).collect();
        let removed = self.backend.delete(&record_keys).await?;
        self.backend.set_remove(CONFIG_INDEX_KEY, keys).await?;

        info!("Batch-deleted {} of {} configuration keys", removed, keys.len());

        Ok(())
    }

    /// Search entries by case-insensitive substring match
    ///
    /// An empty keyword returns the full listing. Otherwise an entry
    /// matches when the lowered keyword is a substring of its key, its
    /// stringified value, its description, or any tag. Ordering is
    /// inherited from [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` on backend faults.
    pub async fn search(&self, keyword: &str) -> StoreResult<Vec<ConfigEntryView>> {
        let entries = self.list().await?;
        if keyword.is_empty() {
            return Ok(entries);
        }

        let needle = keyword.to_lowercase();
        Ok(entries
            .into_iter()
            .filter(|entry| entry_matches(entry, &needle))
            .collect())
    }
}

/// Whether an entry matches a lowered search needle in any of its key,
/// stringified value, description, or tags
fn entry_matches(entry: &ConfigEntryView, needle: &str) -> bool {
    let value_text = match &entry.value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    entry.key.to_lowercase().contains(needle)
        || value_text.to_lowercase().contains(needle)
        || entry
            .description
            .as_ref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
        || entry
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|tag| tag.to_lowercase().contains(needle)))
}

/// Validate a create request before any backend traffic
fn validate_create(request: &CreateConfigRequest) -> StoreResult<()> {
    if request.key.is_empty() {
        return Err(StoreError::missing_field("key"));
    }
    if request.value.is_empty() {
        return Err(StoreError::missing_field("value"));
    }
    if !is_valid_key(&request.key) {
        return Err(StoreError::invalid_format(
            "configuration key must start with a letter and contain only \
             letters, digits, dots, underscores, and hyphens",
        ));
    }
    if request.value_type == ValueType::Json {
        serde_json::from_str::<serde_json::Value>(&request.value)
            .map_err(|e| StoreError::invalid_input(format!("value is not valid JSON: {e}")))?;
    }
    Ok(())
}
