//! HTTP client for the Google Trends web API
//!
//! Features:
//! - Two-step explore / interest-over-time query
//! - Rate limiting with governor
//! - Retry with exponential backoff on 429, 5xx and timeouts
//! - Per-request timeout
//! - User-Agent rotation

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client,
};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use url::Url;

use super::wire::{
    decode_timeline, ComparisonItem, ExploreRequest, ExploreResponse, MultilineResponse,
    TimelinePoint, Widget,
};
use super::TrendsSource;
use crate::config::ProviderConfig;
use crate::models::Series;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};
use crate::utils::{strip_json_prefix, truncate_text};

const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

/// Google Trends client
pub struct TrendsClient {
    /// HTTP client with timeout, compression and cookie store
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Backoff policy for transient failures
    retry: RetryConfig,

    /// Provider root; endpoint paths are joined onto it
    base_url: Url,

    /// Fixed query parameters
    params: ProviderConfig,
}

impl TrendsClient {
    /// Create a new client from provider configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a bad base URL, `FetchError::Http`
    /// if the HTTP client cannot be created
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        let retry = RetryConfig::with_delays(
            config.max_retries,
            config.retry_base_delay_ms,
            RetryConfig::default().max_delay_ms,
        );

        Ok(Self {
            client,
            rate_limiter,
            retry,
            base_url,
            params: config.clone(),
        })
    }

    /// Create a client against a custom base URL (mock servers in tests)
    ///
    /// # Errors
    ///
    /// Same as [`TrendsClient::new`]
    pub fn with_base_url(base_url: &str, config: &ProviderConfig) -> Result<Self, FetchError> {
        let config = ProviderConfig {
            base_url: base_url.to_string(),
            ..config.clone()
        };
        Self::new(&config)
    }

    /// Resolve `keyword` into query widgets
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the body cannot be decoded
    pub async fn explore(&self, keyword: &str) -> Result<ExploreResponse, FetchError> {
        let req = ExploreRequest {
            comparison_items: vec![ComparisonItem {
                keyword,
                geo: &self.params.geo,
                time: &self.params.time_window,
            }],
            category: self.params.category,
            property: &self.params.property,
        };
        let req = serde_json::to_string(&req)
            .map_err(|e| FetchError::Decode(format!("explore request: {e}")))?;

        let url = self.build_url(EXPLORE_PATH, &[("req", req)])?;
        tracing::debug!(keyword = %keyword, "Exploring keyword");

        self.get_json(url).await
    }

    /// Fetch the raw interest-over-time timeline for a widget
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the request fails or the body cannot be decoded
    pub async fn interest_over_time(
        &self,
        widget: &Widget,
    ) -> Result<Vec<TimelinePoint>, FetchError> {
        let req = serde_json::to_string(&widget.request)
            .map_err(|e| FetchError::Decode(format!("widget request: {e}")))?;

        let url = self.build_url(
            MULTILINE_PATH,
            &[("req", req), ("token", widget.token.clone())],
        )?;
        tracing::debug!(widget = %widget.id, "Fetching interest over time");

        let response: MultilineResponse = self.get_json(url).await?;
        Ok(response.default.timeline_data)
    }

    /// Build an endpoint URL with the common `hl`/`tz` parameters
    fn build_url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))?;

        url.query_pairs_mut()
            .append_pair("hl", &self.params.language)
            .append_pair("tz", &self.params.tz_offset_minutes.to_string())
            .extend_pairs(extra.iter().map(|(k, v)| (*k, v.as_str())));

        Ok(url)
    }

    /// GET with rate limiting and retry, then decode the prefixed JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let body = with_retry_if(&self.retry, || self.get_once(&url), FetchError::is_retryable)
            .await
            .map_err(|e| {
                if self.retry.max_retries > 0 && e.is_retryable() {
                    FetchError::MaxRetriesExceeded {
                        last: e.to_string(),
                    }
                } else {
                    e
                }
            })?;

        serde_json::from_str(strip_json_prefix(&body)).map_err(|e| {
            FetchError::Decode(format!("{e} in body: {}", truncate_text(&body, 120)))
        })
    }

    async fn get_once(&self, url: &Url) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url.clone())
            .headers(self.build_headers())
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        response.text().await.map_err(Self::map_transport)
    }

    fn map_transport(e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(e)
        }
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let user_agent = match &self.params.user_agent {
            Some(ua) => HeaderValue::from_str(ua).ok(),
            None => None,
        }
        .unwrap_or_else(|| HeaderValue::from_static(self.random_user_agent()));
        headers.insert(USER_AGENT, user_agent);

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        if let Ok(lang) = HeaderValue::from_str(&self.params.language.to_lowercase()) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        headers
    }

    fn random_user_agent(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0])
    }
}

#[async_trait]
impl TrendsSource for TrendsClient {
    async fn fetch(&self, keyword: &str) -> Result<Series, FetchError> {
        let explore = self.explore(keyword).await?;
        let widget = explore
            .timeseries_widget()
            .ok_or_else(|| FetchError::MissingWidget(keyword.to_string()))?;

        let timeline = self.interest_over_time(widget).await?;
        let series = decode_timeline(&timeline)?;

        tracing::debug!(
            keyword = %keyword,
            raw_points = timeline.len(),
            points = series.len(),
            "Fetched window"
        );
        Ok(series)
    }
}
