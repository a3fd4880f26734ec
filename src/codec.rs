// ABOUTME: Type-aware value encoding and decoding for configuration entries
// ABOUTME: Converts between the stored string form and the logical typed value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Value codec
//!
//! Configuration values persist as strings regardless of their declared
//! [`ValueType`]; this module converts between that stored form and the
//! logical value used for presentation and search.
//!
//! Decoding is total: a stored string that fails to parse for its declared
//! type decodes to the raw string itself, never to an error. The stored
//! string is the durable source of truth and decoding is a presentation
//! convenience, so listing and search stay available even when an entry
//! holds malformed data. The raw-string fallback is an explicit policy,
//! not exception suppression.

use crate::models::ValueType;
use serde_json::Value;

/// Encode a logical value into its stored string form
///
/// Structured values under `ValueType::Json` are pretty-printed; everything
/// else is rendered as its plain string content.
#[must_use]
pub fn encode(value: &Value, value_type: ValueType) -> String {
    if value_type == ValueType::Json && (value.is_object() || value.is_array()) {
        return serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a stored string into its logical value
///
/// Never fails; see the module docs for the fallback policy.
#[must_use]
pub fn decode(stored: &str, value_type: ValueType) -> Value {
    match value_type {
        ValueType::String => Value::String(stored.to_owned()),
        ValueType::Number => decode_number(stored),
        ValueType::Boolean => Value::Bool(stored == "true"),
        ValueType::Json => {
            serde_json::from_str(stored).unwrap_or_else(|_| Value::String(stored.to_owned()))
        }
    }
}

/// Parse a stored number, preferring integer representation
///
/// Integers keep their exact JSON form; anything else goes through a finite
/// float parse. Non-numeric input falls back to the raw string.
fn decode_number(stored: &str) -> Value {
    let trimmed = stored.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(stored.to_owned()), Value::Number)
}
