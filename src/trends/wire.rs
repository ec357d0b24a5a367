//! Provider request and response shapes
//!
//! The explore endpoint resolves a keyword into widgets; the `TIMESERIES`
//! widget's `request` and `token` are then replayed against the multiline
//! endpoint to get interest over time.

use serde::{Deserialize, Serialize};

use crate::models::{Point, Series};
use crate::utils::error::FetchError;

/// Widget id carrying the interest-over-time query
pub const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// `req` payload for the explore endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ExploreRequest<'a> {
    #[serde(rename = "comparisonItem")]
    pub comparison_items: Vec<ComparisonItem<'a>>,
    pub category: u32,
    pub property: &'a str,
}

/// One keyword/geo/time combination to explore
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonItem<'a> {
    pub keyword: &'a str,
    pub geo: &'a str,
    pub time: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// A query handle returned by explore
#[derive(Debug, Clone, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: String,

    pub token: String,

    /// Opaque request object, sent back verbatim as `req`
    pub request: serde_json::Value,
}

impl ExploreResponse {
    /// The interest-over-time widget, or the first widget if none is tagged
    #[must_use]
    pub fn timeseries_widget(&self) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .or_else(|| self.widgets.first())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultilineResponse {
    pub default: MultilineData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultilineData {
    #[serde(rename = "timelineData", default)]
    pub timeline_data: Vec<TimelinePoint>,
}

/// Raw timeline sample; both fields arrive as strings
#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePoint {
    /// Epoch seconds
    pub time: String,

    #[serde(rename = "formattedValue", default)]
    pub formatted_value: Vec<String>,
}

impl TimelinePoint {
    fn decode(&self) -> Result<Point, FetchError> {
        let secs: i64 = self
            .time
            .trim()
            .parse()
            .map_err(|e| FetchError::Decode(format!("timestamp '{}': {e}", self.time)))?;

        let raw = self
            .formatted_value
            .first()
            .ok_or_else(|| FetchError::Decode(format!("no value at {secs}")))?;
        let value: u32 = raw
            .trim()
            .parse()
            .map_err(|e| FetchError::Decode(format!("value '{raw}' at {secs}: {e}")))?;

        Point::from_epoch(secs, value)
            .ok_or_else(|| FetchError::Decode(format!("timestamp {secs} out of range")))
    }
}

/// Convert raw timeline samples into a usable series
///
/// The provider always closes the window with a partial sample for the
/// current instant, so the final point is dropped whatever its value.
pub fn decode_timeline(points: &[TimelinePoint]) -> Result<Series, FetchError> {
    let mut series = points
        .iter()
        .map(TimelinePoint::decode)
        .collect::<Result<Series, _>>()?;
    series.pop();
    Ok(series)
}
