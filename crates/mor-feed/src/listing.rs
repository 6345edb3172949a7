use std::fs::File;
use std::io;
use std::path::Path;

use csv::StringRecord;

use crate::price::{parse_locale_price, strip_currency};
use crate::source::{reader_builder, require_columns};
use crate::{FeedKind, FeedSource, RowError};

const COL_LISTING_ID: usize = 0;
const COL_CODE: usize = 1;
const COL_QUANTITY: usize = 5;
const COL_PRICE: usize = 8;
const COL_OUT_OF_STOCK_CONTROL: usize = 22;
const MIN_COLUMNS: usize = COL_OUT_OF_STOCK_CONTROL + 1;

/// Marketplace custom labels carry the catalog code in their first 10 chars.
pub const CODE_LEN: usize = 10;

/// One active listing from the marketplace report.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub listing_id: String,
    pub code: String,
    pub quantity: i64,
    pub price: f64,
    /// False only when the report says exactly `false` (any case).
    pub out_of_stock_control: bool,
}

pub type ListingReportSource<R = File> = FeedSource<ListingRecord, R>;

/// Open a listing report. The first row is a header and is skipped.
pub fn open_listing_report(path: &Path) -> io::Result<ListingReportSource> {
    let file = File::open(path)?;
    Ok(read_listing_report(file))
}

pub fn read_listing_report<R: io::Read>(rdr: R) -> ListingReportSource<R> {
    FeedSource::new(
        FeedKind::ListingReport,
        reader_builder(true).from_reader(rdr),
        parse_listing_row,
    )
}

pub fn parse_listing_row(row: &StringRecord) -> Result<ListingRecord, RowError> {
    require_columns(row, MIN_COLUMNS)?;

    let code: String = row[COL_CODE].chars().take(CODE_LEN).collect();

    let raw_qty = row[COL_QUANTITY].trim();
    let quantity: i64 = raw_qty.parse().map_err(|_| RowError::BadInteger {
        column: COL_QUANTITY,
        raw: raw_qty.to_string(),
    })?;

    let raw_price = &row[COL_PRICE];
    let price = parse_locale_price(&strip_currency(raw_price)).map_err(|_| RowError::BadPrice {
        column: COL_PRICE,
        raw: raw_price.to_string(),
    })?;

    let out_of_stock_control = !row[COL_OUT_OF_STOCK_CONTROL]
        .trim()
        .eq_ignore_ascii_case("false");

    Ok(ListingRecord {
        listing_id: row[COL_LISTING_ID].trim().to_string(),
        code,
        quantity,
        price,
        out_of_stock_control,
    })
}
