use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Inbox lookup failures. Fatal for the pass that asked.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no input file found in '{}'", dir.display())]
    NotFound { dir: PathBuf },
    #[error("expected exactly one input file in '{}', found {count} entries", dir.display())]
    Ambiguous { dir: PathBuf, count: usize },
    #[error("cannot read inbox '{}': {source}", dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single row that cannot become a record. Recovered by the source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected at least {expected} columns, got {got}")]
    TooFewColumns { expected: usize, got: usize },
    #[error("column {column}: empty product code")]
    EmptyCode { column: usize },
    #[error("column {column}: cannot parse integer from '{raw}'")]
    BadInteger { column: usize, raw: String },
    #[error("column {column}: cannot parse price from '{raw}'")]
    BadPrice { column: usize, raw: String },
    #[error("undecodable row: {0}")]
    Decode(String),
}

/// A price field that is not a usable amount.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("not a number: {0}")]
    Unparsable(#[from] ParseFloatError),
    #[error("not a finite amount")]
    NotFinite,
    #[error("negative amount")]
    Negative,
}
