//! Store snapshot reporting
//!
//! The driver hands the whole store to a [`Reporter`] after seeding and after
//! every keyword update.

use std::io::{self, Write};

use crate::storage::SeriesStore;

/// Output sink for store snapshots
pub trait Reporter: Send {
    /// Render the current contents of the store
    fn report(&mut self, store: &SeriesStore) -> io::Result<()>;
}

/// Plain listing: the keyword on its own line, then `<timestamp> <value>`
/// for every point
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Report to stdout
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Report to any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&mut self, store: &SeriesStore) -> io::Result<()> {
        for (keyword, series) in store.iter() {
            writeln!(self.out, "{keyword}")?;
            for point in series {
                writeln!(self.out, "{point}")?;
            }
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, Series};

    #[test]
    fn test_console_listing() {
        let mut store = SeriesStore::new();
        store.set(
            "rust",
            Series::from(vec![
                Point::from_epoch(0, 10).unwrap(),
                Point::from_epoch(60, 20).unwrap(),
            ]),
        );
        store.set("go", Series::new());

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report(&store).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();

        assert_eq!(
            out,
            "go\nrust\n1970-01-01 00:00:00 UTC 10\n1970-01-01 00:01:00 UTC 20\n"
        );
    }

    #[test]
    fn test_empty_store_writes_nothing() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report(&SeriesStore::new()).unwrap();
        assert!(reporter.into_inner().is_empty());
    }
}
