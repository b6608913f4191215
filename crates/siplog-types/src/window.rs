//! Calendar time windows for filtering and aggregation.
//!
//! A [`Window`] is a predicate over record timestamps: an exact calendar
//! month, an exact calendar year, or all-time. Month and year windows are
//! half-open instant ranges `[lower, upper)` on the UTC calendar, so the
//! twelve months of a year partition that year with no overlap.
//!
//! Windows are anchored: [`Window::month_of`] and [`Window::year_of`] take
//! any reference date, not just "now", and [`Window::last_months`] walks
//! backwards through the calendar for menu-style listings.
//!
//! # Example
//!
//! ```
//! use siplog_types::Window;
//! use time::{Month, macros::datetime};
//!
//! let january = Window::Month { year: 2025, month: Month::January };
//! assert!(january.contains(datetime!(2025-01-15 08:30:00 UTC)));
//! assert!(!january.contains(datetime!(2025-02-01 00:00:00 UTC)));
//!
//! let parsed: Window = "2025-01".parse()?;
//! assert_eq!(parsed, january);
//! # Ok::<(), siplog_types::ParseError>(())
//! ```

use core::fmt;
use core::str::FromStr;

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::ParseError;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// A time-range predicate over record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// One calendar month.
    Month { year: i32, month: Month },
    /// One calendar year.
    Year(i32),
    /// The identity filter: every record passes.
    AllTime,
}

impl Window {
    /// The month window containing `anchor`.
    #[must_use]
    pub fn month_of(anchor: OffsetDateTime) -> Self {
        let anchor = anchor.to_offset(UtcOffset::UTC);
        Window::Month {
            year: anchor.year(),
            month: anchor.month(),
        }
    }

    /// The year window containing `anchor`.
    #[must_use]
    pub fn year_of(anchor: OffsetDateTime) -> Self {
        Window::Year(anchor.to_offset(UtcOffset::UTC).year())
    }

    /// Inclusive lower / exclusive upper instant bounds of the window.
    ///
    /// `AllTime` has no bounds and returns `None`. A month window spans
    /// from the first instant of the month to the first instant of the
    /// next month.
    #[must_use]
    pub fn bounds(&self) -> Option<(OffsetDateTime, OffsetDateTime)> {
        match *self {
            Window::AllTime => None,
            Window::Year(year) => Some((
                month_start(year, Month::January),
                month_start(year.saturating_add(1), Month::January),
            )),
            Window::Month { year, month } => {
                let end = match month {
                    Month::December => month_start(year.saturating_add(1), Month::January),
                    _ => month_start(year, month.next()),
                };
                Some((month_start(year, month), end))
            }
        }
    }

    /// Whether `at` falls inside the window.
    ///
    /// Timestamps are normalized to UTC first, so membership is a property
    /// of the instant, not of whatever offset the record was written with.
    /// Equivalent to `[lower, upper)` membership on [`bounds`](Self::bounds).
    #[must_use]
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        let at = at.to_offset(UtcOffset::UTC);
        match *self {
            Window::AllTime => true,
            Window::Year(year) => at.year() == year,
            Window::Month { year, month } => at.year() == year && at.month() == month,
        }
    }

    /// The `count` month windows ending at the one containing `anchor`,
    /// newest first.
    #[must_use]
    pub fn last_months(anchor: OffsetDateTime, count: u32) -> Vec<Self> {
        let anchor = anchor.to_offset(UtcOffset::UTC);
        let mut year = anchor.year();
        let mut month = anchor.month();
        let mut windows = Vec::with_capacity(count as usize);
        for _ in 0..count {
            windows.push(Window::Month { year, month });
            if month == Month::January {
                year -= 1;
                month = Month::December;
            } else {
                month = month.previous();
            }
        }
        windows
    }

    /// The twelve month windows of `year`, January first.
    #[must_use]
    pub fn months_of(year: i32) -> [Self; 12] {
        MONTHS.map(|month| Window::Month { year, month })
    }

    /// The `count` year windows ending at the one containing `anchor`,
    /// newest first.
    #[must_use]
    pub fn recent_years(anchor: OffsetDateTime, count: u32) -> Vec<Self> {
        let year = anchor.to_offset(UtcOffset::UTC).year();
        (0..count as i32).map(|back| Window::Year(year - back)).collect()
    }
}

/// First instant of the given month, saturating past the calendar range.
///
/// No representable timestamp lies beyond the range, so a saturated bound
/// simply yields an empty window.
fn month_start(year: i32, month: Month) -> OffsetDateTime {
    Date::from_calendar_date(year, month, 1)
        .map(|date| date.midnight().assume_utc())
        .unwrap_or_else(|_| PrimitiveDateTime::MAX.assume_utc())
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Window::Month { year, month } => {
                write!(f, "{year:04}-{:02}", u8::from(month))
            }
            Window::Year(year) => write!(f, "{year:04}"),
            Window::AllTime => f.write_str("all"),
        }
    }
}

impl FromStr for Window {
    type Err = ParseError;

    /// Parse `all`, `YYYY`, or `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("all") || token.eq_ignore_ascii_case("all-time") {
            return Ok(Window::AllTime);
        }
        match token.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year
                    .parse()
                    .map_err(|_| ParseError::InvalidWindow(s.to_string()))?;
                let number: u8 = month
                    .parse()
                    .map_err(|_| ParseError::InvalidWindow(s.to_string()))?;
                let month =
                    Month::try_from(number).map_err(|_| ParseError::MonthOutOfRange(number))?;
                Ok(Window::Month { year, month })
            }
            None => token
                .parse::<i32>()
                .map(Window::Year)
                .map_err(|_| ParseError::InvalidWindow(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn month_bounds_are_half_open() {
        let window = Window::Month {
            year: 2025,
            month: Month::January,
        };
        let (lower, upper) = window.bounds().unwrap();
        assert_eq!(lower, datetime!(2025-01-01 00:00:00 UTC));
        assert_eq!(upper, datetime!(2025-02-01 00:00:00 UTC));

        assert!(window.contains(lower));
        assert!(window.contains(datetime!(2025-01-31 23:59:59.999 UTC)));
        assert!(!window.contains(upper));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let window = Window::Month {
            year: 2024,
            month: Month::December,
        };
        let (_, upper) = window.bounds().unwrap();
        assert_eq!(upper, datetime!(2025-01-01 00:00:00 UTC));
    }

    #[test]
    fn year_bounds_cover_whole_year() {
        let window = Window::Year(2025);
        let (lower, upper) = window.bounds().unwrap();
        assert_eq!(lower, datetime!(2025-01-01 00:00:00 UTC));
        assert_eq!(upper, datetime!(2026-01-01 00:00:00 UTC));
        assert!(window.contains(datetime!(2025-06-15 12:00:00 UTC)));
        assert!(!window.contains(datetime!(2026-01-01 00:00:00 UTC)));
    }

    #[test]
    fn all_time_passes_everything() {
        assert!(Window::AllTime.bounds().is_none());
        assert!(Window::AllTime.contains(datetime!(1970-01-01 00:00:00 UTC)));
        assert!(Window::AllTime.contains(datetime!(2999-12-31 23:59:59 UTC)));
    }

    #[test]
    fn contains_normalizes_offsets() {
        // 2025-01-31 23:00 -03:00 is 2025-02-01 02:00 UTC: February, not January.
        let window = Window::Month {
            year: 2025,
            month: Month::January,
        };
        assert!(!window.contains(datetime!(2025-01-31 23:00:00 -3)));
        assert!(window.contains(datetime!(2025-01-31 21:00:00 -3)));
    }

    #[test]
    fn anchored_constructors_use_the_utc_calendar() {
        // 23:00 -03:00 on Jan 31 is already February in UTC.
        let anchor = datetime!(2025-01-31 23:00:00 -3);
        assert_eq!(
            Window::month_of(anchor),
            Window::Month { year: 2025, month: Month::February }
        );
        assert_eq!(Window::year_of(anchor), Window::Year(2025));
        assert_eq!(
            Window::year_of(datetime!(2024-12-31 23:00:00 -3)),
            Window::Year(2025)
        );
    }

    #[test]
    fn months_partition_the_year() {
        let timestamps = [
            datetime!(2025-01-01 00:00:00 UTC),
            datetime!(2025-01-31 23:59:59 UTC),
            datetime!(2025-02-01 00:00:00 UTC),
            datetime!(2025-06-15 12:00:00 UTC),
            datetime!(2025-12-31 23:59:59 UTC),
            datetime!(2024-12-31 23:59:59 UTC),
            datetime!(2026-01-01 00:00:00 UTC),
        ];
        let year = Window::Year(2025);

        for at in timestamps {
            let matching = Window::months_of(2025)
                .iter()
                .filter(|month| month.contains(at))
                .count();
            // Inside the year exactly one month claims the instant, outside none.
            assert_eq!(matching, usize::from(year.contains(at)), "at {at}");
        }
    }

    #[test]
    fn last_months_walks_back_across_years() {
        let windows = Window::last_months(datetime!(2025-02-10 09:00:00 UTC), 4);
        assert_eq!(
            windows,
            vec![
                Window::Month { year: 2025, month: Month::February },
                Window::Month { year: 2025, month: Month::January },
                Window::Month { year: 2024, month: Month::December },
                Window::Month { year: 2024, month: Month::November },
            ]
        );
    }

    #[test]
    fn recent_years_counts_down() {
        let years = Window::recent_years(datetime!(2025-06-01 00:00:00 UTC), 3);
        assert_eq!(
            years,
            vec![Window::Year(2025), Window::Year(2024), Window::Year(2023)]
        );
    }

    #[test]
    fn parses_window_tokens() {
        assert_eq!("all".parse::<Window>(), Ok(Window::AllTime));
        assert_eq!("All-Time".parse::<Window>(), Ok(Window::AllTime));
        assert_eq!("2025".parse::<Window>(), Ok(Window::Year(2025)));
        assert_eq!(
            "2025-01".parse::<Window>(),
            Ok(Window::Month { year: 2025, month: Month::January })
        );
        assert_eq!(
            "2025-13".parse::<Window>(),
            Err(ParseError::MonthOutOfRange(13))
        );
        assert!(matches!(
            "janvier".parse::<Window>(),
            Err(ParseError::InvalidWindow(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for window in [
            Window::AllTime,
            Window::Year(2024),
            Window::Month { year: 2025, month: Month::September },
        ] {
            let shown = window.to_string();
            assert_eq!(shown.parse::<Window>(), Ok(window), "token {shown}");
        }
    }
}
