use std::fmt;
use std::fs::File;
use std::io;

use csv::StringRecord;
use tracing::{error, warn};

use crate::{RowError, DELIMITER, QUOTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    StockExtract,
    ListingReport,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::StockExtract => "stock_extract",
            FeedKind::ListingReport => "listing_report",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running counters for one pass over a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub rows_read: u64,
    pub rows_ok: u64,
    pub rows_rejected: u64,
    /// Set when the underlying reader failed; the stream ended early and the
    /// caller must not treat the pass as complete.
    pub io_error: Option<String>,
}

/// Lazy, single-pass stream of parsed records.
///
/// Rows that fail to decode or parse are logged with their contents and
/// counted in [`FeedStats::rows_rejected`]; only successes are yielded. An
/// I/O failure ends the stream and is recorded in [`FeedStats::io_error`].
pub struct FeedSource<T, R = File> {
    kind: FeedKind,
    records: csv::StringRecordsIntoIter<R>,
    parse: fn(&StringRecord) -> Result<T, RowError>,
    stats: FeedStats,
}

impl<T, R: io::Read> FeedSource<T, R> {
    pub(crate) fn new(
        kind: FeedKind,
        reader: csv::Reader<R>,
        parse: fn(&StringRecord) -> Result<T, RowError>,
    ) -> Self {
        Self {
            kind,
            records: reader.into_records(),
            parse,
            stats: FeedStats::default(),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }
}

impl<T, R: io::Read> Iterator for FeedSource<T, R> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.stats.io_error.is_some() {
            return None;
        }

        loop {
            let rec = self.records.next()?;
            self.stats.rows_read += 1;
            let row = self.stats.rows_read;

            let rec = match rec {
                Ok(r) => r,
                Err(e) if e.is_io_error() => {
                    error!(feed = %self.kind, row, error = %e, "feed read failed; stream stopped");
                    self.stats.io_error = Some(e.to_string());
                    return None;
                }
                Err(e) => {
                    let err = RowError::Decode(e.to_string());
                    warn!(feed = %self.kind, row, error = %err, "rejected row");
                    self.stats.rows_rejected += 1;
                    continue;
                }
            };

            match (self.parse)(&rec) {
                Ok(v) => {
                    self.stats.rows_ok += 1;
                    return Some(v);
                }
                Err(err) => {
                    warn!(feed = %self.kind, row, raw = ?rec, error = %err, "rejected row");
                    self.stats.rows_rejected += 1;
                }
            }
        }
    }
}

/// Reader with the shared feed dialect. Rows of any width are accepted here;
/// column-count checks belong to the per-row parse functions.
pub(crate) fn reader_builder(has_headers: bool) -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.delimiter(DELIMITER)
        .quote(QUOTE)
        .has_headers(has_headers)
        .flexible(true);
    b
}

/// Width check done once per row so parsers can index columns directly.
pub(crate) fn require_columns(row: &StringRecord, expected: usize) -> Result<(), RowError> {
    if row.len() < expected {
        return Err(RowError::TooFewColumns {
            expected,
            got: row.len(),
        });
    }
    Ok(())
}
