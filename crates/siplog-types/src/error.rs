//! Parse errors for siplog-types.

use thiserror::Error;

/// Errors from parsing textual representations of siplog types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A window token that is not `all`, `YYYY`, or `YYYY-MM`.
    #[error("invalid window `{0}`: expected `all`, `YYYY`, or `YYYY-MM`")]
    InvalidWindow(String),

    /// A month number outside 1..=12.
    #[error("month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u8),
}
