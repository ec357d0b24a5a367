//! Error types for trendstitch
//!
//! This module defines the domain error types for fetching and stitching.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while fetching a trends window
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded (last status: {last})")]
    MaxRetriesExceeded { last: String },

    /// Payload could not be decoded (bad JSON, non-numeric timestamp or value)
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Explore response carried no widget to query
    #[error("No widgets returned for keyword '{0}'")]
    MissingWidget(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether a retry may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Timeout => true,
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Errors that can occur while stitching a fetched window onto a series
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// The incoming window does not contain the existing series' last instant
    #[error("No overlap: incoming window does not contain {last_timestamp}")]
    NoOverlap { last_timestamp: DateTime<Utc> },
}
