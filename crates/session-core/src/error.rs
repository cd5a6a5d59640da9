use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad error category used for recovery behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionErrorCategory {
    /// Backend unreachable, pairing rejected, reconnect failed.
    /// Recovered by reverting the connection to disconnected.
    Connectivity,
    /// Chat or message retrieval failure.
    /// Recovered by substituting deterministic fallback content.
    Data,
    /// Internal invariant break.
    Internal,
}

/// Stable error payload surfaced across the session boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{category:?}:{code}: {message}")]
pub struct SessionError {
    /// High-level error category.
    pub category: SessionErrorCategory,
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl SessionError {
    /// Construct a new session error.
    pub fn new(
        category: SessionErrorCategory,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build a connectivity-classified error.
    pub fn connectivity(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(SessionErrorCategory::Connectivity, code, message)
    }

    /// Build a data-fetch-classified error.
    pub fn data(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(SessionErrorCategory::Data, code, message)
    }
}
