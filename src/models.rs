// ABOUTME: Data model for configuration entries and request payloads
// ABOUTME: Defines the persisted record, the decoded presentation view, and value type tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration entry data model
//!
//! [`ConfigEntry`] is the persisted unit: its `value` is always the
//! string-encoded form, regardless of [`ValueType`]. [`ConfigEntryView`] is
//! the presentation form returned by read paths, with the value decoded to
//! its logical type. Field names serialize in the wire format existing
//! deployments already persist (`type`, `createdAt`, `updatedAt`).

use crate::codec;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical type tag for a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Plain text, stored and returned as-is
    String,
    /// Numeric value, decoded via integer-then-float parse
    Number,
    /// Boolean value, true iff the stored literal is `"true"`
    Boolean,
    /// Structured value, stored as a JSON document string
    Json,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A persisted configuration entry
///
/// The key is immutable after creation (renaming a key is delete + create).
/// `value_type` never changes across updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique configuration key, matching `^[A-Za-z][A-Za-z0-9._-]*$`
    pub key: String,
    /// String-encoded value (the durable source of truth)
    pub value: String,
    /// Logical type of the value
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional tags, insertion order preserved for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Millisecond epoch timestamp, set once at creation
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Millisecond epoch timestamp, refreshed on every successful update
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// A configuration entry with its value decoded for presentation
///
/// Produced by read paths; the `value` holds the logical typed value, or
/// the raw stored string when decoding falls back (see [`crate::codec`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntryView {
    pub key: String,
    /// Decoded value: string, number, boolean, or structured JSON
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl ConfigEntryView {
    /// Decode a persisted entry into its presentation form
    #[must_use]
    pub fn from_entry(entry: ConfigEntry) -> Self {
        let value = codec::decode(&entry.value, entry.value_type);
        Self {
            key: entry.key,
            value,
            value_type: entry.value_type,
            description: entry.description,
            tags: entry.tags,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Request payload for creating a configuration entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConfigRequest {
    pub key: String,
    /// String-encoded value to persist
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Request payload for updating a configuration entry
///
/// Omitted fields mean "no change"; `key` and `value_type` can never be
/// updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Current time as a millisecond epoch timestamp
#[must_use]
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
