//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use trendstitch::error::FetchError;
use trendstitch::models::{Point, Series};
use trendstitch::report::Reporter;
use trendstitch::storage::SeriesStore;
use trendstitch::trends::TrendsSource;

/// Build a series from `(epoch_secs, value)` pairs
pub fn series(points: &[(i64, u32)]) -> Series {
    points
        .iter()
        .map(|&(t, v)| Point::from_epoch(t, v).unwrap())
        .collect()
}

/// Flatten a series back into `(epoch_secs, value)` pairs
pub fn pairs(series: &Series) -> Vec<(i64, u32)> {
    series
        .iter()
        .map(|p| (p.timestamp.timestamp(), p.value))
        .collect()
}

/// Explore response body with the provider's anti-JSON prefix
pub fn explore_body(token: &str) -> String {
    format!(
        ")]}}'\n{{\"widgets\":[\
         {{\"id\":\"GEO_MAP\",\"title\":\"Interest by subregion\",\"token\":\"geo-token\",\"request\":{{\"resolution\":\"REGION\"}}}},\
         {{\"id\":\"TIMESERIES\",\"title\":\"Interest over time\",\"token\":\"{token}\",\"request\":{{\"time\":\"now 4-H\",\"resolution\":\"MINUTE\"}}}}\
         ]}}"
    )
}

/// Multiline response body with the provider's anti-JSON prefix
pub fn multiline_body(points: &[(i64, &str)]) -> String {
    let timeline: Vec<String> = points
        .iter()
        .map(|(t, v)| {
            format!(
                "{{\"time\":\"{t}\",\"formattedTime\":\"t{t}\",\"formattedAxisTime\":\"a{t}\",\"value\":[0],\"hasData\":[true],\"formattedValue\":[\"{v}\"]}}"
            )
        })
        .collect();
    format!(
        ")]}}',\n{{\"default\":{{\"timelineData\":[{}],\"averages\":[]}}}}",
        timeline.join(",")
    )
}

/// Scripted source: each keyword pops its next canned response
#[derive(Clone, Default)]
pub struct ScriptedSource {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Result<Series, FetchError>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, keyword: &str, series: Series) {
        self.push(keyword, Ok(series));
    }

    pub fn push_err(&self, keyword: &str, err: FetchError) {
        self.push(keyword, Err(err));
    }

    fn push(&self, keyword: &str, response: Result<Series, FetchError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(keyword.to_string())
            .or_default()
            .push_back(response);
    }

    /// Keywords fetched, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendsSource for ScriptedSource {
    async fn fetch(&self, keyword: &str) -> Result<Series, FetchError> {
        self.calls.lock().unwrap().push(keyword.to_string());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(keyword)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(FetchError::Decode(format!("no script for {keyword}"))))
    }
}

/// Reporter that keeps a copy of every snapshot
#[derive(Clone, Default)]
pub struct SnapshotReporter {
    snapshots: Arc<Mutex<Vec<SeriesStore>>>,
}

impl SnapshotReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<SeriesStore> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl Reporter for SnapshotReporter {
    fn report(&mut self, store: &SeriesStore) -> std::io::Result<()> {
        self.snapshots.lock().unwrap().push(store.clone());
        Ok(())
    }
}
