// ABOUTME: Unified error handling for the configuration store
// ABOUTME: Defines error codes, HTTP status hints, and response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling
//!
//! Centralized error types for the configuration store. Every operation
//! returns a stable, distinguishable [`ErrorCode`] so the embedding
//! transport layer can map failures to status codes and user-facing
//! messages. The store itself never retries or rewords a failure; the
//! first error propagates to the caller untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,

    // Backend (5000-5999)
    #[serde(rename = "BACKEND_UNAVAILABLE")]
    BackendUnavailable = 5000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 9002,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// This is a hint for the embedding transport layer; the status mapping
    /// is not part of the store's contract and may differ by deployment.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists => 409,

            // 503 Service Unavailable
            Self::BackendUnavailable => 503,

            // 500 Internal Server Error
            Self::InternalError | Self::SerializationError | Self::ConfigInvalid => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested configuration was not found",
            Self::ResourceAlreadyExists => "A configuration with this key already exists",
            Self::BackendUnavailable => "The key-value backend is unavailable",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ConfigInvalid => "Configuration is invalid",
        }
    }
}

/// Unified error type for the configuration store
#[derive(Debug, Error)]
pub struct StoreError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new `StoreError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code hint for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether this error is the not-found case
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.code, ErrorCode::ResourceNotFound)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type StoreResult<T> = Result<T, StoreError>;

/// HTTP error response format for the embedding transport layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl From<StoreError> for ErrorResponse {
    fn from(error: StoreError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl StoreError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing from the request
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("missing required field: {}", field.into()),
        )
    }

    /// Malformed identifier or data format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Configuration entry not found
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("configuration '{}' not found", key.into()),
        )
    }

    /// Configuration key already live
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            format!("configuration '{}' already exists", key.into()),
        )
    }

    /// Backend network or storage fault
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendUnavailable, message)
    }

    /// Record serialization/deserialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Invalid store configuration (bad backend URL, etc.)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Conversion from `anyhow::Error` to `StoreError`
impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ResourceAlreadyExists.http_status(), 409);
        assert_eq!(ErrorCode::BackendUnavailable.http_status(), 503);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_store_error_creation() {
        let error = StoreError::not_found("app.name");
        assert_eq!(error.code, ErrorCode::ResourceNotFound);
        assert!(error.is_not_found());
        assert!(error.message.contains("app.name"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = StoreError::already_exists("db.host");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("RESOURCE_ALREADY_EXISTS"));
        assert!(json.contains("db.host"));
    }
}
