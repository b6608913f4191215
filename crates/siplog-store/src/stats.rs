//! Aggregates over record collections.
//!
//! Pure, stateless functions: identical input always produces identical
//! output, so the same code safely feeds the month, year, and all-time
//! views. Pair them with a window-filtered query, or use [`Summary::of`]
//! to compute everything in one pass over the slice.

use serde::Serialize;

use siplog_types::LogRecord;

/// Scale factor for [`average_unit_price`]: price per 100 units
/// (100 g of beans, 100 ml of drink).
pub const UNIT_PRICE_SCALE: f64 = 100.0;

/// Number of records.
pub fn count<R: LogRecord>(records: &[R]) -> usize {
    records.len()
}

/// Sum of record quantities (milliliters or grams).
pub fn total_quantity<R: LogRecord>(records: &[R]) -> f64 {
    records.iter().map(LogRecord::quantity).sum()
}

/// Sum of money spent.
pub fn total_spent<R: LogRecord>(records: &[R]) -> f64 {
    records.iter().map(LogRecord::amount_spent).sum()
}

/// Average price per [`UNIT_PRICE_SCALE`] units, or `0.0` for an empty or
/// zero-quantity collection.
pub fn average_unit_price<R: LogRecord>(records: &[R]) -> f64 {
    let quantity = total_quantity(records);
    if quantity > 0.0 {
        total_spent(records) / quantity * UNIT_PRICE_SCALE
    } else {
        0.0
    }
}

/// All aggregates of one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records.
    pub count: usize,
    /// Total quantity (milliliters or grams).
    pub total_quantity: f64,
    /// Total money spent.
    pub total_spent: f64,
    /// Average price per 100 units; `0.0` when nothing was consumed.
    pub average_unit_price: f64,
}

impl Summary {
    /// Compute every aggregate for the given records.
    pub fn of<R: LogRecord>(records: &[R]) -> Self {
        Self {
            count: count(records),
            total_quantity: total_quantity(records),
            total_spent: total_spent(records),
            average_unit_price: average_unit_price(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siplog_types::{GrainFields, GrainPurchase};
    use time::macros::datetime;
    use uuid::Uuid;

    fn grain(weight: f64, price: f64) -> GrainPurchase {
        GrainPurchase::build(
            Uuid::new_v4(),
            GrainFields {
                date: datetime!(2025-05-01 10:00:00 UTC),
                name: "Test beans".to_string(),
                weight,
                price,
            },
        )
    }

    #[test]
    fn sums_quantities_and_spend() {
        let records = vec![grain(250.0, 1200.0), grain(1000.0, 2400.0)];
        assert_eq!(count(&records), 2);
        assert_eq!(total_quantity(&records), 1250.0);
        assert_eq!(total_spent(&records), 3600.0);
    }

    #[test]
    fn unit_price_is_scaled_per_100() {
        let records = vec![grain(250.0, 1200.0)];
        assert_eq!(average_unit_price(&records), 480.0);
    }

    #[test]
    fn unit_price_of_nothing_is_zero() {
        let empty: Vec<GrainPurchase> = Vec::new();
        assert_eq!(average_unit_price(&empty), 0.0);

        // Zero-quantity records are permitted and must not divide by zero.
        let freebies = vec![grain(0.0, 500.0)];
        assert_eq!(average_unit_price(&freebies), 0.0);
    }

    #[test]
    fn summary_matches_the_free_functions() {
        let records = vec![grain(250.0, 1200.0), grain(750.0, 1800.0)];
        let summary = Summary::of(&records);
        assert_eq!(summary.count, count(&records));
        assert_eq!(summary.total_quantity, total_quantity(&records));
        assert_eq!(summary.total_spent, total_spent(&records));
        assert_eq!(summary.average_unit_price, average_unit_price(&records));
    }
}
