//! trendstitch - continuous keyword interest from overlapping trends windows
//!
//! The trends provider only serves short windows of *relative* interest,
//! each renormalized to 0-100 on its own. trendstitch polls one window per
//! keyword on a fixed interval and stitches consecutive windows into one
//! consistently scaled series.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`trends`] - Provider access ([`trends::TrendsSource`], [`trends::TrendsClient`])
//! - [`stitch`] - Window alignment and rescaling
//! - [`storage`] - In-memory keyword → series store
//! - [`driver`] - Seed / tick / run loop
//! - [`report`] - Snapshot output
//! - [`models`] - Core data structures
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use trendstitch::config::Config;
//! use trendstitch::driver::Driver;
//! use trendstitch::report::ConsoleReporter;
//! use trendstitch::trends::TrendsClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let client = TrendsClient::new(&config.provider)?;
//!     let mut driver = Driver::new(client, ConsoleReporter::stdout(), vec!["rust".into()]);
//!     driver.run(config.interval(), async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod report;
pub mod stitch;
pub mod storage;
pub mod trends;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::driver::{Driver, FetchPolicy, KeywordOutcome, TickSummary};
    pub use crate::error::{Error, ErrorCategory, ErrorClass, Result};
    pub use crate::models::{Point, Series};
    pub use crate::report::{ConsoleReporter, Reporter};
    pub use crate::stitch::{stitch, Scaling, StitchOptions, StitchReport};
    pub use crate::storage::SeriesStore;
    pub use crate::trends::{TrendsClient, TrendsSource};
}

// Direct re-exports for convenience
pub use models::{Point, Series};
