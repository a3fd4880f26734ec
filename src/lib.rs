// ABOUTME: Main library entry point for the confstore dynamic configuration store
// ABOUTME: Exposes the store, value codec, key-value backends, and supporting modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Confstore
//!
//! A dynamic configuration store backed by an external key-value store.
//! Clients create, read, update, delete, search, and batch-delete named
//! configuration entries, each holding a typed value (string, number,
//! boolean, or JSON), an optional description, and tags.
//!
//! ## Architecture
//!
//! - **Store**: [`store::ConfigStore`] owns the mapping from configuration
//!   key to entry and keeps a secondary index of all live keys in lock-step
//!   with the primary records.
//! - **Backends**: pluggable key-value backends behind
//!   [`backend::KeyValueBackend`] — Redis for deployments, in-memory for
//!   tests and single-process use.
//! - **Codec**: [`codec`] converts between the stored string form of a value
//!   and its logical typed representation. Decoding never fails; malformed
//!   stored data degrades to the raw string.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confstore::backend::Backend;
//! use confstore::config::StoreConfig;
//! use confstore::models::{CreateConfigRequest, ValueType};
//! use confstore::store::ConfigStore;
//!
//! # async fn example() -> Result<(), confstore::errors::StoreError> {
//! let config = StoreConfig::from_env();
//! let backend = Backend::new(&config.backend_url, &config.redis_connection).await?;
//! let store = ConfigStore::new(backend);
//!
//! let entry = store
//!     .create(CreateConfigRequest {
//!         key: "app.name".into(),
//!         value: "My App".into(),
//!         value_type: ValueType::String,
//!         description: Some("Application display name".into()),
//!         tags: Some(vec!["app".into()]),
//!     })
//!     .await?;
//! println!("created {}", entry.key);
//! # Ok(())
//! # }
//! ```

/// Pluggable key-value backends (Redis, in-memory)
pub mod backend;
/// Type-aware value encoding and decoding
pub mod codec;
/// Environment-based configuration
pub mod config;
/// System-wide constants and storage layout
pub mod constants;
/// Unified error handling
pub mod errors;
/// Backend health reporting
pub mod health;
/// Structured logging setup
pub mod logging;
/// Configuration entry data model
pub mod models;
/// The configuration store service
pub mod store;

pub use backend::{Backend, KeyValueBackend};
pub use errors::{ErrorCode, StoreError, StoreResult};
pub use models::{ConfigEntry, ConfigEntryView, CreateConfigRequest, UpdateConfigRequest, ValueType};
pub use store::ConfigStore;
