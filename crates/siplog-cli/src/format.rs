//! Display helpers for text output.

use time::{OffsetDateTime, UtcOffset};

/// Format a price for text output, with the configured currency symbol.
pub fn price(amount: f64, currency: Option<&str>) -> String {
    match currency {
        Some(symbol) => format!("{amount:.0} {symbol}"),
        None => format!("{amount:.2}"),
    }
}

/// Calendar day of a timestamp, `YYYY-MM-DD` on the UTC calendar.
///
/// Matches the calendar that window filtering uses, so a listed record
/// always appears under the month its day suggests.
pub fn day(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!("{:04}-{:02}-{:02}", at.year(), u8::from(at.month()), at.day())
}
