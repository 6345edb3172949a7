//! Inbound feed parsing (read side only).
//!
//! Two feeds arrive as `;`-delimited, `"`-quoted text files, one file per
//! inbox directory:
//!
//! | Feed            | Header | Columns used                                        |
//! |-----------------|--------|-----------------------------------------------------|
//! | stock extract   | no     | 0 code, 2/3/4 price candidates, 9 quantity          |
//! | listing report  | yes    | 0 listing id, 1 code, 5 quantity, 8 price, 22 oosc  |
//!
//! Sources are lazy single-pass iterators. Each row goes through a parse
//! function returning `Result<_, RowError>`; rejected rows are logged and
//! counted, never yielded. Nothing here touches the catalog database.

mod error;
mod listing;
mod locate;
mod price;
mod source;
mod stock;

pub use error::{LocateError, PriceError, RowError};
pub use listing::{
    open_listing_report, parse_listing_row, read_listing_report, ListingRecord,
    ListingReportSource,
};
pub use locate::locate_single_file;
pub use price::{check_price, parse_locale_price, strip_currency};
pub use source::{FeedKind, FeedSource, FeedStats};
pub use stock::{
    open_stock_extract, parse_stock_row, read_stock_extract, StockExtractSource, StockRecord,
};

/// Column delimiter shared by every feed and by revision outputs.
pub const DELIMITER: u8 = b';';
/// Quote character shared by every feed and by revision outputs.
pub const QUOTE: u8 = b'"';
