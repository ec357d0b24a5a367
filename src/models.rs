// Core data structures for trendstitch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::slice::SliceIndex;

/// One sample of relative interest for a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Sample instant (second resolution)
    pub timestamp: DateTime<Utc>,

    /// Relative value; 0-100 as fetched, may exceed 100 once rescaled
    pub value: u32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, value: u32) -> Self {
        Self { timestamp, value }
    }

    /// Create a point from epoch seconds, `None` if out of range
    #[must_use]
    pub fn from_epoch(secs: i64, value: u32) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|timestamp| Self { timestamp, value })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp, self.value)
    }
}

/// Ordered sequence of points for one keyword
///
/// A freshly fetched window is strictly increasing by timestamp. A stitched
/// series is non-decreasing: each seam repeats the alignment instant once
/// unless the stitcher was told to drop it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Point>);

impl Series {
    /// Create an empty series
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the series holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent point
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// First point
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// All points in order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Iterate over points in order
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    /// Values in order
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().map(|p| p.value)
    }

    /// Check whether timestamps never go backwards
    #[must_use]
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Count adjacent points sharing a timestamp (stitch seams)
    #[must_use]
    pub fn seam_duplicates(&self) -> usize {
        self.0
            .windows(2)
            .filter(|w| w[0].timestamp == w[1].timestamp)
            .count()
    }

    /// Drop the most recent point, returning it
    pub(crate) fn pop(&mut self) -> Option<Point> {
        self.0.pop()
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.0
    }

    pub(crate) fn extend_from_slice(&mut self, points: &[Point]) {
        self.0.extend_from_slice(points);
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for Series {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: SliceIndex<[Point]>> Index<I> for Series {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, u32)]) -> Series {
        points
            .iter()
            .map(|&(t, v)| Point::from_epoch(t, v).unwrap())
            .collect()
    }

    #[test]
    fn test_point_from_epoch() {
        let p = Point::from_epoch(1_700_000_000, 42).unwrap();
        assert_eq!(p.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(p.value, 42);
    }

    #[test]
    fn test_point_display() {
        let p = Point::from_epoch(0, 7).unwrap();
        assert_eq!(p.to_string(), "1970-01-01 00:00:00 UTC 7");
    }

    #[test]
    fn test_series_accessors() {
        let s = series(&[(60, 1), (120, 2), (180, 3)]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.first().unwrap().value, 1);
        assert_eq!(s.last().unwrap().value, 3);
        assert_eq!(s.values().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(s[1].value, 2);
        assert_eq!(s[1..].len(), 2);
    }

    #[test]
    fn test_seam_duplicates() {
        let s = series(&[(60, 1), (120, 2), (120, 4), (180, 6)]);
        assert!(s.is_non_decreasing());
        assert_eq!(s.seam_duplicates(), 1);

        let backwards = series(&[(120, 1), (60, 2)]);
        assert!(!backwards.is_non_decreasing());
    }

    #[test]
    fn test_series_serializes_as_array() {
        let s = series(&[(0, 5)]);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["value"], 5);
    }
}
