//! Platform-agnostic types for the siplog consumption log.
//!
//! This crate defines the record values shared by every siplog component:
//! the drink log and the grain-purchase log are structurally identical
//! subsystems, and both are described here by plain data types plus the
//! [`LogRecord`] seam that lets one store implementation serve both.
//!
//! # Features
//!
//! - **Records**: [`Drink`] and [`GrainPurchase`], immutable-by-replacement
//!   values with store-generated ids
//! - **Categories**: [`DrinkKind`], a closed enumeration with an
//!   [`Other`](DrinkKind::Other) escape hatch carrying a free-text name
//! - **Time windows**: [`Window`], calendar month / year / all-time
//!   predicates anchored at any reference date
//!
//! Serde support is enabled by default and can be disabled with
//! `default-features = false`. Timestamps always serialize as RFC 3339
//! strings, never locale-formatted text.

mod drink;
mod error;
mod grain;
mod record;
mod window;

pub use drink::{Drink, DrinkFields, DrinkKind, KNOWN_KINDS};
pub use error::ParseError;
pub use grain::{GrainFields, GrainPurchase};
pub use record::LogRecord;
pub use window::Window;
