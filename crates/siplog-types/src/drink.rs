//! The drink record and its category enumeration.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::record::LogRecord;

/// Kind of coffee drink.
///
/// A closed set of known preparations plus an [`Other`](Self::Other)
/// variant carrying a free-text name for anything off the list. The
/// variant tag is the identity of the category; display text lives in
/// [`label`](Self::label) and is never used for matching or storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DrinkKind {
    Espresso,
    Doppio,
    Americano,
    Latte,
    Cappuccino,
    FlatWhite,
    Mocha,
    Macchiato,
    Ristretto,
    Filter,
    Aeropress,
    V60,
    Chemex,
    Cezve,
    Capsule,
    ColdBrew,
    Matcha,
    /// A drink outside the known set, named by the user.
    #[cfg_attr(feature = "serde", serde(untagged))]
    Other(String),
}

/// Every known kind, in menu order. `Other` is not listed; it is the
/// escape hatch, not a selectable category.
pub const KNOWN_KINDS: [DrinkKind; 17] = [
    DrinkKind::Espresso,
    DrinkKind::Doppio,
    DrinkKind::Americano,
    DrinkKind::Latte,
    DrinkKind::Cappuccino,
    DrinkKind::FlatWhite,
    DrinkKind::Mocha,
    DrinkKind::Macchiato,
    DrinkKind::Ristretto,
    DrinkKind::Filter,
    DrinkKind::Aeropress,
    DrinkKind::V60,
    DrinkKind::Chemex,
    DrinkKind::Cezve,
    DrinkKind::Capsule,
    DrinkKind::ColdBrew,
    DrinkKind::Matcha,
];

impl DrinkKind {
    /// Stable machine-readable tag for a known kind, or the override name.
    ///
    /// This is the string the persisted snapshot carries.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            DrinkKind::Espresso => "espresso",
            DrinkKind::Doppio => "doppio",
            DrinkKind::Americano => "americano",
            DrinkKind::Latte => "latte",
            DrinkKind::Cappuccino => "cappuccino",
            DrinkKind::FlatWhite => "flat_white",
            DrinkKind::Mocha => "mocha",
            DrinkKind::Macchiato => "macchiato",
            DrinkKind::Ristretto => "ristretto",
            DrinkKind::Filter => "filter",
            DrinkKind::Aeropress => "aeropress",
            DrinkKind::V60 => "v60",
            DrinkKind::Chemex => "chemex",
            DrinkKind::Cezve => "cezve",
            DrinkKind::Capsule => "capsule",
            DrinkKind::ColdBrew => "cold_brew",
            DrinkKind::Matcha => "matcha",
            DrinkKind::Other(name) => name,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            DrinkKind::Espresso => "Espresso",
            DrinkKind::Doppio => "Doppio",
            DrinkKind::Americano => "Americano",
            DrinkKind::Latte => "Latte",
            DrinkKind::Cappuccino => "Cappuccino",
            DrinkKind::FlatWhite => "Flat white",
            DrinkKind::Mocha => "Mocha",
            DrinkKind::Macchiato => "Macchiato",
            DrinkKind::Ristretto => "Ristretto",
            DrinkKind::Filter => "Filter",
            DrinkKind::Aeropress => "Aeropress",
            DrinkKind::V60 => "V60",
            DrinkKind::Chemex => "Chemex",
            DrinkKind::Cezve => "Cezve",
            DrinkKind::Capsule => "Capsule",
            DrinkKind::ColdBrew => "Cold brew",
            DrinkKind::Matcha => "Matcha",
            DrinkKind::Other(name) => name,
        }
    }

    /// Look up a known kind by its slug or label (case-insensitive).
    ///
    /// Returns `None` for anything outside the closed set; callers that
    /// accept free-form input fall back to [`DrinkKind::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use siplog_types::DrinkKind;
    ///
    /// assert_eq!(DrinkKind::from_name("espresso"), Some(DrinkKind::Espresso));
    /// assert_eq!(DrinkKind::from_name("Flat white"), Some(DrinkKind::FlatWhite));
    /// assert_eq!(DrinkKind::from_name("flat_white"), Some(DrinkKind::FlatWhite));
    /// assert_eq!(DrinkKind::from_name("barley brew"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        KNOWN_KINDS.into_iter().find(|kind| {
            kind.slug().eq_ignore_ascii_case(name) || kind.label().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for DrinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logged drink.
///
/// Immutable by replacement: edits go through the store, which rebuilds
/// the record from a [`DrinkFields`] draft while keeping the id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Drink {
    /// Store-generated unique identifier. Never reused.
    pub id: Uuid,
    /// When the drink was consumed.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub date: OffsetDateTime,
    /// Volume in milliliters.
    pub ml: u32,
    /// Money spent.
    pub price: f64,
    /// Where the drink was had.
    pub place: String,
    /// Category of the drink.
    pub kind: DrinkKind,
}

/// The mutable fields of a [`Drink`]: everything except the id.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkFields {
    pub date: OffsetDateTime,
    pub ml: u32,
    pub price: f64,
    pub place: String,
    pub kind: DrinkKind,
}

impl LogRecord for Drink {
    type Fields = DrinkFields;

    fn build(id: Uuid, fields: DrinkFields) -> Self {
        Self {
            id,
            date: fields.date,
            ml: fields.ml,
            price: fields.price,
            place: fields.place,
            kind: fields.kind,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn recorded_at(&self) -> OffsetDateTime {
        self.date
    }

    fn quantity(&self) -> f64 {
        f64::from(self.ml)
    }

    fn amount_spent(&self) -> f64 {
        self.price
    }
}
