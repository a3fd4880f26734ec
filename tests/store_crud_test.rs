// ABOUTME: Unit tests for configuration store CRUD operations
// ABOUTME: Tests create/get/update/delete contracts against the in-memory backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use confstore::backend::{Backend, MemoryBackend};
use confstore::errors::ErrorCode;
use confstore::models::{CreateConfigRequest, UpdateConfigRequest, ValueType};
use confstore::store::ConfigStore;
use serde_json::json;

/// Helper: Create a store over a fresh in-memory backend
fn memory_store() -> ConfigStore {
    ConfigStore::new(Backend::Memory(MemoryBackend::new()))
}

/// Helper: Create request with sensible defaults
fn create_request(key: &str, value: &str, value_type: ValueType) -> CreateConfigRequest {
    CreateConfigRequest {
        key: key.to_owned(),
        value: value.to_owned(),
        value_type,
        description: None,
        tags: None,
    }
}

#[tokio::test]
async fn test_create_and_get() -> Result<()> {
    let store = memory_store();

    let created = store
        .create(CreateConfigRequest {
            key: "app.name".into(),
            value: "My App".into(),
            value_type: ValueType::String,
            description: Some("Application display name".into()),
            tags: Some(vec!["app".into(), "display".into()]),
        })
        .await?;

    assert_eq!(created.key, "app.name");
    assert_eq!(created.value, json!("My App"));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get("app.name").await?.expect("entry should exist");
    assert_eq!(fetched.key, created.key);
    assert_eq!(fetched.value, created.value);
    assert_eq!(fetched.description.as_deref(), Some("Application display name"));
    assert_eq!(
        fetched.tags,
        Some(vec!["app".to_owned(), "display".to_owned()])
    );

    Ok(())
}

#[tokio::test]
async fn test_get_absent_is_none_not_error() -> Result<()> {
    let store = memory_store();
    assert!(store.get("never.created").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_create_duplicate_key_fails() -> Result<()> {
    let store = memory_store();

    store
        .create(create_request("db.host", "localhost", ValueType::String))
        .await?;

    let err = store
        .create(create_request("db.host", "other-host", ValueType::String))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    // The first record is untouched
    let entry = store.get("db.host").await?.unwrap();
    assert_eq!(entry.value, json!("localhost"));

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_malformed_key() -> Result<()> {
    let store = memory_store();

    for bad_key in ["1digit", ".dot", "has space", "slash/ed", "配置"] {
        let err = store
            .create(create_request(bad_key, "v", ValueType::String))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat, "key: {bad_key}");
    }

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_invalid_json_value() -> Result<()> {
    let store = memory_store();

    let err = store
        .create(create_request("settings", "{broken", ValueType::Json))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // Nothing was persisted
    assert!(store.get("settings").await?.is_none());
    assert!(store.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_empty_fields() -> Result<()> {
    let store = memory_store();

    let err = store
        .create(create_request("", "v", ValueType::String))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let err = store
        .create(create_request("a.key", "", ValueType::String))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    Ok(())
}

#[tokio::test]
async fn test_update_merges_supplied_fields() -> Result<()> {
    let store = memory_store();

    store
        .create(CreateConfigRequest {
            key: "timeout".into(),
            value: "30".into(),
            value_type: ValueType::Number,
            description: Some("Request timeout".into()),
            tags: Some(vec!["http".into()]),
        })
        .await?;

    let updated = store
        .update(
            "timeout",
            UpdateConfigRequest {
                value: Some("60".into()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.value, json!(60));
    // Omitted fields keep their prior value
    assert_eq!(updated.description.as_deref(), Some("Request timeout"));
    assert_eq!(updated.tags, Some(vec!["http".to_owned()]));

    Ok(())
}

#[tokio::test]
async fn test_update_preserves_type_and_created_at() -> Result<()> {
    let store = memory_store();

    let created = store
        .create(create_request("retries", "3", ValueType::Number))
        .await?;

    let updated = store
        .update(
            "retries",
            UpdateConfigRequest {
                value: Some("5".into()),
                description: Some("Retry budget".into()),
                tags: Some(vec!["reliability".into()]),
            },
        )
        .await?;

    assert_eq!(updated.value_type, ValueType::Number);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    Ok(())
}

#[tokio::test]
async fn test_update_missing_key_fails() -> Result<()> {
    let store = memory_store();

    let err = store
        .update(
            "nope",
            UpdateConfigRequest {
                value: Some("v".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_entry() -> Result<()> {
    let store = memory_store();

    store
        .create(create_request("transient", "x", ValueType::String))
        .await?;
    store.delete("transient").await?;

    assert!(store.get("transient").await?.is_none());
    assert!(store.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_key_fails() -> Result<()> {
    let store = memory_store();

    let err = store.delete("missing").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_typed_values_decode_in_views() -> Result<()> {
    let store = memory_store();

    store
        .create(create_request("flag", "true", ValueType::Boolean))
        .await?;
    store
        .create(create_request("ratio", "0.75", ValueType::Number))
        .await?;
    store
        .create(create_request(
            "limits",
            r#"{"max": 10, "min": 1}"#,
            ValueType::Json,
        ))
        .await?;

    assert_eq!(store.get("flag").await?.unwrap().value, json!(true));
    assert_eq!(store.get("ratio").await?.unwrap().value, json!(0.75));
    assert_eq!(
        store.get("limits").await?.unwrap().value,
        json!({"max": 10, "min": 1})
    );

    Ok(())
}

#[tokio::test]
async fn test_malformed_stored_value_degrades_to_raw_string() -> Result<()> {
    let store = memory_store();

    // A json-typed entry can end up holding a malformed document after an
    // unvalidated update; reads must still succeed
    store
        .create(create_request("settings", r#"{"a": 1}"#, ValueType::Json))
        .await?;
    store
        .update(
            "settings",
            UpdateConfigRequest {
                value: Some("not-json".into()),
                ..Default::default()
            },
        )
        .await?;

    let entry = store.get("settings").await?.unwrap();
    assert_eq!(entry.value, json!("not-json"));

    Ok(())
}
