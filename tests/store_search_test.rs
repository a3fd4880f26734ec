// ABOUTME: Unit tests for configuration search and listing order
// ABOUTME: Tests case-insensitive substring OR-matching across key, value, description, and tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use confstore::backend::{Backend, MemoryBackend};
use confstore::models::{CreateConfigRequest, UpdateConfigRequest, ValueType};
use confstore::store::ConfigStore;

fn memory_store() -> ConfigStore {
    ConfigStore::new(Backend::Memory(MemoryBackend::new()))
}

async fn seed(store: &ConfigStore) -> Result<()> {
    store
        .create(CreateConfigRequest {
            key: "app.name".into(),
            value: "My App".into(),
            value_type: ValueType::String,
            description: Some("应用名称".into()),
            tags: Some(vec!["app".into()]),
        })
        .await?;
    store
        .create(CreateConfigRequest {
            key: "db.port".into(),
            value: "5432".into(),
            value_type: ValueType::Number,
            description: Some("Database port".into()),
            tags: Some(vec!["database".into(), "network".into()]),
        })
        .await?;
    store
        .create(CreateConfigRequest {
            key: "features".into(),
            value: r#"{"darkMode": true}"#.into(),
            value_type: ValueType::Json,
            description: None,
            tags: None,
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_search_matches_key_case_insensitively() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    for keyword in ["app", "APP", "App"] {
        let hits = store.search(keyword).await?;
        assert!(
            hits.iter().any(|e| e.key == "app.name"),
            "keyword: {keyword}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_search_matches_value_description_and_tags() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    // Stringified value
    let hits = store.search("5432").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "db.port");

    // Description, including non-ASCII text
    let hits = store.search("应用").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "app.name");

    // Tag
    let hits = store.search("network").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "db.port");

    Ok(())
}

#[tokio::test]
async fn test_search_matches_inside_json_values() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    // The decoded JSON document is matched through its string form
    let hits = store.search("darkmode").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "features");

    Ok(())
}

#[tokio::test]
async fn test_search_no_match_returns_empty() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    assert!(store.search("xyz").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_keyword_returns_full_listing() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    let all = store.list().await?;
    let searched = store.search("").await?;
    assert_eq!(searched, all);
    assert_eq!(searched.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_list_orders_by_most_recently_updated() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    // Touch the oldest entry; it must move to the front
    store
        .update(
            "app.name",
            UpdateConfigRequest {
                value: Some("Renamed App".into()),
                ..Default::default()
            },
        )
        .await?;

    let listed = store.list().await?;
    assert_eq!(listed[0].key, "app.name");
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));

    Ok(())
}

#[tokio::test]
async fn test_search_ordering_inherited_from_list() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    store
        .update(
            "db.port",
            UpdateConfigRequest {
                description: Some("Primary database port".into()),
                ..Default::default()
            },
        )
        .await?;

    // Both "app.name" (tag "app") and "db.port" (description) match; the
    // more recently updated entry comes first
    let hits = store.search("a").await?;
    assert!(hits.len() >= 2);
    assert!(hits
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));

    Ok(())
}

#[tokio::test]
async fn test_list_grouped_by_key() -> Result<()> {
    let store = memory_store();
    seed(&store).await?;

    let grouped = store.list_grouped().await?;
    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped["app.name"].len(), 1);
    assert_eq!(grouped["app.name"][0].key, "app.name");

    Ok(())
}
