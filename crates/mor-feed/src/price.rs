use crate::PriceError;

/// Remove every occurrence of the `EUR` currency suffix.
pub fn strip_currency(raw: &str) -> String {
    raw.replace("EUR", "")
}

/// Convert an Italian-formatted price (`1.234,56`) into a float.
///
/// Rule: trim; empty means 0; otherwise drop every `.` (thousands separator),
/// turn `,` into `.` (decimal separator) and parse.
pub fn parse_locale_price(raw: &str) -> Result<f64, PriceError> {
    let p = raw.trim();
    if p.is_empty() {
        return Ok(0.0);
    }
    let v: f64 = p.replace('.', "").replace(',', ".").parse()?;
    check_price(v)
}

/// Prices are finite and non-negative. `NaN`, `inf` and `-1` all parse as
/// floats and are refused here.
pub fn check_price(v: f64) -> Result<f64, PriceError> {
    if !v.is_finite() {
        return Err(PriceError::NotFinite);
    }
    if v < 0.0 {
        return Err(PriceError::Negative);
    }
    Ok(v)
}
