//! Stable error codes carried in every error body.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
//! assert_eq!(ErrorCode::NotFound.code(), 1004);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body could not be read as the expected JSON shape
    JsonExtraction,

    NotFound,

    /// Query string could not be deserialized
    QueryExtraction,

    // Store errors (2000-2999)
    /// The backing store rejected or failed an operation
    StoreError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::QueryExtraction => "QUERY_EXTRACTION",
            Self::StoreError => "STORE_ERROR",
        }
    }

    /// Integer code for logs and metrics.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: store errors
    pub fn code(&self) -> i32 {
        match self {
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::QueryExtraction => 1013,
            Self::StoreError => 2003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::QueryExtraction => "Failed to parse query string",
            Self::StoreError => "A storage error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
