//! Unified error handling for the trendstitch crate
//!
//! Fetch failures are wrapped by a single [`Error`] enum alongside output and
//! configuration failures. Stitch anomalies ([`StitchError`]) never become
//! fatal; they are classified through [`ErrorClass`] for logging only.

use std::io;
use thiserror::Error;

pub use crate::utils::error::{FetchError, StitchError};

/// Common classification interface for trendstitch errors
pub trait ErrorClass: std::error::Error {
    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, rate limit)
    Network,
    /// Payload decoding errors
    Parsing,
    /// Window alignment and rescaling anomalies
    Stitching,
    /// Output and I/O errors
    Output,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    /// Short description for the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Stitching => "stitching error",
            Self::Output => "output error",
            Self::Config => "configuration error",
        }
    }
}

impl ErrorClass for FetchError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) | Self::MissingWidget(_) => ErrorCategory::Parsing,
            Self::InvalidUrl(_) => ErrorCategory::Config,
            _ => ErrorCategory::Network,
        }
    }
}

impl ErrorClass for StitchError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Stitching
    }
}

/// Unified error type for the trendstitch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl ErrorClass for Error {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Io(_) => ErrorCategory::Output,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
