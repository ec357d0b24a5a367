//! Trends provider access
//!
//! [`TrendsSource`] is the seam the driver fetches through; [`TrendsClient`]
//! implements it against the Google Trends web API.

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::models::Series;
use crate::utils::error::FetchError;

pub use client::TrendsClient;
pub use wire::decode_timeline;

/// Source of recent trend windows
#[async_trait]
pub trait TrendsSource: Send + Sync {
    /// Fetch the configured lookback window for `keyword`, with the trailing
    /// partial sample already removed
    async fn fetch(&self, keyword: &str) -> Result<Series, FetchError>;
}

#[async_trait]
impl<T: TrendsSource + ?Sized> TrendsSource for std::sync::Arc<T> {
    async fn fetch(&self, keyword: &str) -> Result<Series, FetchError> {
        (**self).fetch(keyword).await
    }
}
