use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::UomError;
use super::ids::{UomCategoryId, UomId};

/// A unit of measure.
///
/// `factor` is the number of this unit in one reference unit of the same
/// category: the reference unit has factor 1, a dozen has factor 1/12, a
/// gram (with kg as reference) has factor 1000.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uom {
    pub id: UomId,
    pub category: UomCategoryId,
    pub factor: Decimal,
    /// Smallest representable step, e.g. `0.01`.
    pub rounding: Decimal,
}

impl Uom {
    /// A reference unit (factor 1) with a rounding precision of `0.01`.
    #[must_use]
    pub fn reference(id: UomId, category: UomCategoryId) -> Self {
        Self {
            id,
            category,
            factor: Decimal::ONE,
            rounding: Decimal::new(1, 2),
        }
    }

    #[must_use]
    pub fn with_factor(mut self, factor: Decimal) -> Self {
        self.factor = factor;
        self
    }

    #[must_use]
    pub fn with_rounding(mut self, rounding: Decimal) -> Self {
        self.rounding = rounding;
        self
    }

    /// Convert `quantity` expressed in `self` into `target`, rounded up to
    /// `target`'s rounding precision.
    ///
    /// # Errors
    ///
    /// Returns [`UomError`] when the units belong to different categories,
    /// when either factor is zero, or when the arithmetic overflows.
    pub fn convert(&self, quantity: Decimal, target: &Uom) -> Result<Decimal, UomError> {
        if self.id == target.id {
            return Ok(quantity);
        }
        if self.category != target.category {
            return Err(UomError::IncompatibleCategories {
                from: self.id,
                to: target.id,
            });
        }
        if self.factor.is_zero() {
            return Err(UomError::ZeroFactor { uom: self.id });
        }
        if target.factor.is_zero() {
            return Err(UomError::ZeroFactor { uom: target.id });
        }

        let amount = quantity
            .checked_div(self.factor)
            .and_then(|reference| reference.checked_mul(target.factor))
            .ok_or(UomError::Overflow {
                from: self.id,
                to: target.id,
            })?;
        Ok(round_up(amount, target.rounding))
    }
}

/// Digits kept before rounding up, so that division residue such as
/// `24.000..001` does not bump the result a whole step.
const STEP_NOISE_DP: u32 = 12;

/// Round away from zero to a multiple of `rounding`. A non-positive
/// rounding leaves the value untouched.
fn round_up(value: Decimal, rounding: Decimal) -> Decimal {
    if rounding <= Decimal::ZERO {
        return value;
    }
    round_to_step(value, rounding, RoundingStrategy::AwayFromZero).unwrap_or(value)
}

/// Round to a multiple of `rounding` with `strategy`. `None` on overflow.
fn round_to_step(value: Decimal, rounding: Decimal, strategy: RoundingStrategy) -> Option<Decimal> {
    value
        .checked_div(rounding)?
        .round_dp(STEP_NOISE_DP)
        .round_dp_with_strategy(0, strategy)
        .checked_mul(rounding)
}

/// Compare two quantities at the given precision.
///
/// Both values are first rounded half away from zero to a multiple of
/// `rounding`, so `1.995` and `2` are equal at `0.01`. A non-positive
/// `rounding`, or one the values cannot be rounded to, falls back to exact
/// comparison.
#[must_use]
pub fn compare_quantities(a: Decimal, b: Decimal, rounding: Decimal) -> Ordering {
    if rounding <= Decimal::ZERO {
        return a.cmp(&b);
    }
    let half = RoundingStrategy::MidpointAwayFromZero;
    let (Some(rounded_a), Some(rounded_b)) = (
        round_to_step(a, rounding, half),
        round_to_step(b, rounding, half),
    ) else {
        return a.cmp(&b);
    };
    rounded_a.cmp(&rounded_b)
}
