//! In-memory series storage
//!
//! Maps each tracked keyword to its stitched series. Entries live for the
//! lifetime of the process; nothing is persisted.

use std::collections::BTreeMap;

use crate::models::Series;

/// Keyword -> stitched series
///
/// Backed by a `BTreeMap` so snapshots iterate in keyword order.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: BTreeMap<String, Series>,
}

impl SeriesStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Series for `keyword`, empty if the keyword has never been stored
    #[must_use]
    pub fn get(&self, keyword: &str) -> Series {
        self.series.get(keyword).cloned().unwrap_or_default()
    }

    /// Mutable series for `keyword`, created empty if absent
    pub fn get_mut(&mut self, keyword: &str) -> &mut Series {
        self.series.entry(keyword.to_string()).or_default()
    }

    /// Replace the series for `keyword`
    pub fn set(&mut self, keyword: impl Into<String>, series: Series) {
        self.series.insert(keyword.into(), series);
    }

    /// Whether `keyword` has an entry
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.series.contains_key(keyword)
    }

    /// Number of keywords stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if no keyword is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of points across all keywords
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.series.values().map(Series::len).sum()
    }

    /// Iterate `(keyword, series)` in keyword order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.series.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn series(points: &[(i64, u32)]) -> Series {
        points
            .iter()
            .map(|&(t, v)| Point::from_epoch(t, v).unwrap())
            .collect()
    }

    #[test]
    fn test_get_absent_is_empty() {
        let store = SeriesStore::new();
        assert!(store.get("rust").is_empty());
        assert!(!store.contains("rust"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_replaces() {
        let mut store = SeriesStore::new();
        store.set("rust", series(&[(0, 1)]));
        store.set("rust", series(&[(0, 2), (60, 3)]));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("rust").len(), 2);
        assert_eq!(store.total_points(), 2);
    }

    #[test]
    fn test_get_mut_creates_entry() {
        let mut store = SeriesStore::new();
        assert!(store.get_mut("go").is_empty());
        assert!(store.contains("go"));
    }

    #[test]
    fn test_iter_sorted_by_keyword() {
        let mut store = SeriesStore::new();
        store.set("zig", Series::new());
        store.set("ada", Series::new());
        store.set("rust", Series::new());

        let keys: Vec<_> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ada", "rust", "zig"]);
    }
}
