use thiserror::Error;
use time::Date;

use super::ids::{RuleId, UomId};

/// Validation failures raised while building a [`Pricelist`](super::Pricelist).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("duplicate rule id {id}")]
    DuplicateRule { id: RuleId },

    #[error("rule {rule} has date_start {start} after date_end {end}")]
    InvalidDateWindow {
        rule: RuleId,
        start: Date,
        end: Date,
    },

    #[error("rule {rule} has a negative minimum quantity")]
    NegativeMinQuantity { rule: RuleId },
}

/// Unit conversion failures.
///
/// Rule matching recovers from these by comparing the unconverted
/// quantity; they only surface when calling [`Uom::convert`](super::Uom::convert)
/// directly.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum UomError {
    #[error("cannot convert {from} to {to}: units belong to different categories")]
    IncompatibleCategories { from: UomId, to: UomId },

    #[error("unit {uom} has a zero conversion factor")]
    ZeroFactor { uom: UomId },

    #[error("converting {from} to {to} overflowed")]
    Overflow { from: UomId, to: UomId },
}
