//! The seam between concrete record types and the generic store.

use time::OffsetDateTime;
use uuid::Uuid;

/// A logged consumption event.
///
/// The drink log and the grain log share one store implementation; this
/// trait is what the store needs from a record: identity, a timestamp for
/// window filtering, and the two numeric measures the aggregator sums.
///
/// Records are immutable by replacement: an update builds a fresh value
/// from a [`Fields`](Self::Fields) draft while the store preserves the id.
/// Ids are always store-generated; nothing outside the store constructs
/// records with externally supplied ids.
pub trait LogRecord: Clone + Send + Sync + 'static {
    /// The mutable field set of the record, everything except the id.
    type Fields: Clone + Send + 'static;

    /// Build a record from an id and a draft of its fields.
    fn build(id: Uuid, fields: Self::Fields) -> Self;

    /// Unique identifier within a store.
    fn id(&self) -> Uuid;

    /// When the event occurred. User-editable, drives all window filtering.
    fn recorded_at(&self) -> OffsetDateTime;

    /// Quantity consumed or purchased (milliliters or grams).
    fn quantity(&self) -> f64;

    /// Money spent on the event.
    fn amount_spent(&self) -> f64;
}
