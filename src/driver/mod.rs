//! Polling driver
//!
//! The [`Driver`] owns the series store and runs the fetch → stitch → report
//! cycle. [`Driver::tick`] is one pass over all keywords and can be called
//! from any scheduler; [`Driver::run`] wraps it in a tokio interval that
//! stops on a shutdown future.
//!
//! Keywords are processed sequentially. The store has a single writer and
//! no reader runs while it is being updated.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::{Error, ErrorClass, Result};
use crate::report::Reporter;
use crate::stitch::{stitch, StitchOptions, StitchReport};
use crate::storage::SeriesStore;
use crate::trends::TrendsSource;
use crate::utils::error::{FetchError, StitchError};

/// What to do when fetching a keyword fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPolicy {
    /// Stop the driver with the fetch error
    #[default]
    Abort,

    /// Log, skip the keyword for this pass, and continue
    Skip,
}

/// Per-keyword result of one pass
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOutcome {
    /// Window stitched (or seeded) into the store
    Stitched(StitchReport),

    /// Window had no shared instant with the stored series; store unchanged
    NoOverlap(StitchError),

    /// Fetch failed and the keyword was skipped (`FetchPolicy::Skip` only)
    FetchFailed(String),
}

/// Result of one pass over all keywords
#[derive(Debug, Clone, Default)]
pub struct TickSummary {
    pub outcomes: Vec<(String, KeywordOutcome)>,
}

impl TickSummary {
    /// Outcome for `keyword`, if it was processed
    #[must_use]
    pub fn outcome(&self, keyword: &str) -> Option<&KeywordOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, o)| o)
    }

    /// Number of keywords whose series advanced
    #[must_use]
    pub fn stitched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, KeywordOutcome::Stitched(_)))
            .count()
    }

    /// Number of keywords that did not advance
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.stitched()
    }
}

/// Owns the store and drives fetch → stitch → report
pub struct Driver<S, R> {
    source: S,
    reporter: R,
    store: SeriesStore,
    keywords: Vec<String>,
    policy: FetchPolicy,
    stitch: StitchOptions,
    ticks: u64,
}

impl<S: TrendsSource, R: Reporter> Driver<S, R> {
    /// Create a driver tracking `keywords`
    pub fn new(source: S, reporter: R, keywords: Vec<String>) -> Self {
        Self {
            source,
            reporter,
            store: SeriesStore::new(),
            keywords,
            policy: FetchPolicy::default(),
            stitch: StitchOptions::default(),
            ticks: 0,
        }
    }

    /// Set the fetch failure policy
    #[must_use]
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the stitching options
    #[must_use]
    pub fn with_stitch_options(mut self, stitch: StitchOptions) -> Self {
        self.stitch = stitch;
        self
    }

    /// Tracked keywords
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Current store contents
    #[must_use]
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// Number of completed ticks
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fetch every keyword once and store the windows as-is, then report
    ///
    /// # Errors
    ///
    /// Returns the first fetch error under `FetchPolicy::Abort`, or an I/O
    /// error from the reporter
    pub async fn seed(&mut self) -> Result<()> {
        info!(keywords = self.keywords.len(), "Seeding series");

        for keyword in &self.keywords {
            match self.source.fetch(keyword).await {
                Ok(series) => {
                    debug!(keyword = %keyword, points = series.len(), "Seeded");
                    self.store.set(keyword.as_str(), series);
                }
                Err(e) => handle_fetch_error(self.policy, keyword, e)?,
            }
        }

        self.reporter.report(&self.store)?;
        Ok(())
    }

    /// One pass: for each keyword fetch, stitch into the store, and report
    ///
    /// A keyword with no stored series yet (its seed fetch was skipped) is
    /// seeded by this pass.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error under `FetchPolicy::Abort`, or an I/O
    /// error from the reporter. Stitch anomalies never fail the pass.
    pub async fn tick(&mut self) -> Result<TickSummary> {
        let mut summary = TickSummary::default();

        for keyword in &self.keywords {
            debug!(keyword = %keyword, "Fetching");

            let incoming = match self.source.fetch(keyword).await {
                Ok(series) => series,
                Err(e) => {
                    let reason = e.to_string();
                    handle_fetch_error(self.policy, keyword, e)?;
                    summary
                        .outcomes
                        .push((keyword.clone(), KeywordOutcome::FetchFailed(reason)));
                    continue;
                }
            };

            let existing = self.store.get_mut(keyword);
            let outcome = match stitch(existing, incoming, &self.stitch) {
                Ok(report) => {
                    if report.scaling.is_degenerate() {
                        warn!(keyword = %keyword, scaling = ?report.scaling, "Appended without rescaling");
                    }
                    KeywordOutcome::Stitched(report)
                }
                Err(e) => {
                    warn!(
                        keyword = %keyword,
                        category = e.category().description(),
                        error = %e,
                        "Skipping update"
                    );
                    KeywordOutcome::NoOverlap(e)
                }
            };
            summary.outcomes.push((keyword.clone(), outcome));

            self.reporter.report(&self.store)?;
        }

        self.ticks += 1;
        info!(
            tick = self.ticks,
            stitched = summary.stitched(),
            skipped = summary.skipped(),
            total_points = self.store.total_points(),
            "Tick complete"
        );

        Ok(summary)
    }

    /// Seed, then tick every `period` until `shutdown` resolves
    ///
    /// The first tick fires one period after seeding. Ticks missed while a
    /// pass overruns are skipped rather than bunched.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error from [`Driver::seed`] or [`Driver::tick`]
    pub async fn run<F>(&mut self, period: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        if period.is_zero() {
            return Err(Error::config("polling interval must be greater than 0"));
        }

        tokio::pin!(shutdown);

        tokio::select! {
            res = self.seed() => res?,
            _ = &mut shutdown => {
                info!("Shutdown requested during seeding");
                return Ok(());
            }
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await?;
                }
                _ = &mut shutdown => {
                    info!(ticks = self.ticks, "Shutdown requested, stopping driver");
                    break;
                }
            }
        }

        Ok(())
    }
}

fn handle_fetch_error(policy: FetchPolicy, keyword: &str, err: FetchError) -> Result<()> {
    match policy {
        FetchPolicy::Abort => {
            error!(keyword = %keyword, error = %err, "Fetch failed");
            Err(Error::Fetch(err))
        }
        FetchPolicy::Skip => {
            warn!(
                keyword = %keyword,
                error = %err,
                category = err.category().description(),
                "Fetch failed, skipping keyword this tick"
            );
            Ok(())
        }
    }
}
