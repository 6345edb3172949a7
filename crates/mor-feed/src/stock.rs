use std::fs::File;
use std::io;
use std::path::Path;

use csv::StringRecord;

use crate::price::check_price;
use crate::source::{reader_builder, require_columns};
use crate::{FeedKind, FeedSource, PriceError, RowError};

const COL_CODE: usize = 0;
const COL_PRICES: [usize; 3] = [2, 3, 4];
const COL_QUANTITY: usize = 9;
const MIN_COLUMNS: usize = COL_QUANTITY + 1;

/// Extract prices are expressed in thousandths of the listing currency.
const PRICE_DIVISOR: f64 = 1000.0;

/// One stock extract row after normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub code: String,
    pub quantity: i64,
    pub price: f64,
}

pub type StockExtractSource<R = File> = FeedSource<StockRecord, R>;

/// Open a stock extract file. The extract has no header row.
pub fn open_stock_extract(path: &Path) -> io::Result<StockExtractSource> {
    let file = File::open(path)?;
    Ok(read_stock_extract(file))
}

pub fn read_stock_extract<R: io::Read>(rdr: R) -> StockExtractSource<R> {
    FeedSource::new(
        FeedKind::StockExtract,
        reader_builder(false).from_reader(rdr),
        parse_stock_row,
    )
}

/// Code from column 0, price = max(col 2, 3, 4) / 1000, quantity from col 9.
pub fn parse_stock_row(row: &StringRecord) -> Result<StockRecord, RowError> {
    require_columns(row, MIN_COLUMNS)?;

    let code = row[COL_CODE].trim();
    if code.is_empty() {
        return Err(RowError::EmptyCode { column: COL_CODE });
    }

    let mut best = f64::NEG_INFINITY;
    for col in COL_PRICES {
        let raw = row[col].trim();
        let v = raw
            .parse::<f64>()
            .map_err(PriceError::from)
            .and_then(check_price)
            .map_err(|_| RowError::BadPrice {
                column: col,
                raw: raw.to_string(),
            })?;
        best = best.max(v);
    }

    let raw_qty = row[COL_QUANTITY].trim();
    let quantity: i64 = raw_qty.parse().map_err(|_| RowError::BadInteger {
        column: COL_QUANTITY,
        raw: raw_qty.to_string(),
    })?;

    Ok(StockRecord {
        code: code.to_string(),
        quantity,
        price: best / PRICE_DIVISOR,
    })
}
