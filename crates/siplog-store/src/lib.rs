//! Reactive local persistence for siplog consumption records.
//!
//! This crate provides the canonical record store shared by the drink and
//! grain-purchase logs: in-memory state with synchronous CRUD, change
//! notification, calendar-window queries and aggregates, and debounced
//! JSON-snapshot persistence.
//!
//! # Features
//!
//! - One generic [`Store`] serving both record types
//! - Fail-open snapshot loading (corrupt data degrades to an empty log,
//!   never a crash)
//! - Atomic full-snapshot saves, coalesced by a per-store debounce timer
//! - Synchronous subscriber callbacks for reactive consumers
//! - Pure aggregate functions and CSV export
//!
//! # Example
//!
//! ```no_run
//! use siplog_store::{Store, StoreOptions, JsonFileSnapshot};
//! use siplog_types::{Drink, DrinkFields, DrinkKind, Window};
//! use time::OffsetDateTime;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store: Store<Drink> = Store::open(
//!     JsonFileSnapshot::new(siplog_store::default_data_path("drinks.json")),
//!     StoreOptions::default(),
//! );
//!
//! store.add(DrinkFields {
//!     date: OffsetDateTime::now_utc(),
//!     ml: 250,
//!     price: 300.0,
//!     place: "Home".to_string(),
//!     kind: DrinkKind::Espresso,
//! });
//!
//! let this_month = store.summary(Window::month_of(OffsetDateTime::now_utc()));
//! println!("{} cups, {:.0} spent", this_month.count, this_month.total_spent);
//!
//! // Persist the tail of the debounce window before exiting.
//! store.flush();
//! # }
//! ```

mod error;
mod events;
mod export;
mod snapshot;
mod stats;
mod store;

pub use error::{Error, Result};
pub use events::{StoreEvent, SubscriptionId};
pub use export::{to_csv_string, write_csv};
pub use snapshot::{JsonFileSnapshot, MemorySnapshot, SnapshotStore};
pub use stats::{
    UNIT_PRICE_SCALE, Summary, average_unit_price, count, total_quantity, total_spent,
};
pub use store::{Store, StoreOptions};

use siplog_types::{Drink, GrainPurchase};

/// Default snapshot path following platform conventions.
///
/// - Linux: `~/.local/share/siplog/<file>`
/// - macOS: `~/Library/Application Support/siplog/<file>`
/// - Windows: `C:\Users\<user>\AppData\Local\siplog\<file>`
pub fn default_data_path(file: &str) -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("siplog")
        .join(file)
}

/// Open the drink log at its default location.
pub fn open_default_drinks() -> Store<Drink> {
    Store::open(
        JsonFileSnapshot::new(default_data_path("drinks.json")),
        StoreOptions::default(),
    )
}

/// Open the grain-purchase log at its default location.
pub fn open_default_grains() -> Store<GrainPurchase> {
    Store::open(
        JsonFileSnapshot::new(default_data_path("grains.json")),
        StoreOptions::default(),
    )
}
