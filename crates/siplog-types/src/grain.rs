//! The grain-purchase record.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::record::LogRecord;

/// One purchased bag of coffee beans.
///
/// The grain log is the parallel variant of the drink log: same store,
/// same windows, same aggregates. Grains carry a free-text `name` as
/// their descriptor and no closed category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrainPurchase {
    /// Store-generated unique identifier. Never reused.
    pub id: Uuid,
    /// When the purchase happened.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub date: OffsetDateTime,
    /// Label of the beans (roaster, origin, blend name).
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
    /// Money spent.
    pub price: f64,
}

/// The mutable fields of a [`GrainPurchase`]: everything except the id.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainFields {
    pub date: OffsetDateTime,
    pub name: String,
    pub weight: f64,
    pub price: f64,
}

impl LogRecord for GrainPurchase {
    type Fields = GrainFields;

    fn build(id: Uuid, fields: GrainFields) -> Self {
        Self {
            id,
            date: fields.date,
            name: fields.name,
            weight: fields.weight,
            price: fields.price,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn recorded_at(&self) -> OffsetDateTime {
        self.date
    }

    fn quantity(&self) -> f64 {
        self.weight
    }

    fn amount_spent(&self) -> f64 {
        self.price
    }
}
