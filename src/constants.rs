// ABOUTME: System-wide constants for the configuration store
// ABOUTME: Contains storage layout, Redis connection defaults, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Application constants organized by domain. The storage layout constants
//! are load-bearing: existing deployments persist records under these names.

/// Persisted storage layout
///
/// Each entry is stored as one JSON document under `config:{key}`; all live
/// configuration keys are tracked in the `config:list` set.
pub mod storage {
    /// Namespace prefix for configuration records
    pub const CONFIG_KEY_PREFIX: &str = "config:";
    /// Fixed name of the secondary index set holding all live keys
    pub const CONFIG_INDEX_KEY: &str = "config:list";
}

/// Redis connection configuration defaults
pub mod redis {
    /// Default Redis URL for local development
    pub const DEFAULT_URL: &str = "redis://localhost:6379";
    /// Redis connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
    /// Redis response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 5;
    /// Number of reconnection retries after a connection drop
    pub const RECONNECTION_RETRIES: usize = 5;
    /// Exponential backoff base for retry delays
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    /// Maximum retry delay in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
    /// Initial connection retry count at startup
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}

/// Service names for logging and health reporting
pub mod service_names {
    /// The configuration store service
    pub const CONFIG_STORE: &str = "confstore";
}
