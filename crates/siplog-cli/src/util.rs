//! Input parsing helpers.

use anyhow::{Context, Result, bail};
use time::{Date, Month, OffsetDateTime};

use siplog_types::Window;

/// Parse a `YYYY-MM-DD` date into the first instant of that day, UTC.
pub fn parse_date(s: &str) -> Result<OffsetDateTime> {
    let token = s.trim();
    let mut parts = token.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("invalid date `{token}`: expected YYYY-MM-DD");
    };

    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in `{token}`"))?;
    let month: u8 = month
        .parse()
        .with_context(|| format!("invalid month in `{token}`"))?;
    let day: u8 = day
        .parse()
        .with_context(|| format!("invalid day in `{token}`"))?;

    let month = Month::try_from(month).with_context(|| format!("invalid month in `{token}`"))?;
    let date = Date::from_calendar_date(year, month, day)
        .with_context(|| format!("invalid date `{token}`"))?;
    Ok(date.midnight().assume_utc())
}

/// Parse a window token (`all`, `YYYY`, `YYYY-MM`).
pub fn parse_window(s: &str) -> Result<Window> {
    Ok(s.parse()?)
}
