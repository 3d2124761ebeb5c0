use rust_decimal::Decimal;
use time::Date;

use super::ids::{CategoryId, ProductId, RuleId, TemplateId, UomId};

/// A pricelist rule as owned by the host pricing store.
///
/// Only the static matching criteria and the two AND-group fields are
/// modelled; the price adjustment itself belongs to the host's
/// [`PriceComposer`](crate::PriceComposer). Rules are read, never mutated,
/// by group evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PricelistRule {
    pub id: RuleId,
    /// Ordering for price composition. Not consulted by group logic.
    pub sequence: u32,
    pub product: Option<ProductId>,
    pub template: Option<TemplateId>,
    /// Matches the category and every descendant of it.
    pub category: Option<CategoryId>,
    /// Minimum line quantity, expressed in [`uom`](Self::uom) (or the
    /// product's own unit when `uom` is unset).
    pub min_quantity: Option<Decimal>,
    pub uom: Option<UomId>,
    pub date_start: Option<Date>,
    pub date_end: Option<Date>,
    pub apply_and_logic: bool,
    /// `0` means ungrouped.
    pub and_group: u32,
}

impl Default for PricelistRule {
    fn default() -> Self {
        Self::new(RuleId(0))
    }
}

impl PricelistRule {
    /// A rule with no criteria: it matches every product at every quantity.
    #[must_use]
    pub fn new(id: RuleId) -> Self {
        Self {
            id,
            sequence: 0,
            product: None,
            template: None,
            category: None,
            min_quantity: None,
            uom: None,
            date_start: None,
            date_end: None,
            apply_and_logic: false,
            and_group: 0,
        }
    }

    /// Whether this rule takes part in AND-group evaluation.
    ///
    /// Both the flag and a positive group number are required; a rule with
    /// `and_group == 0` is never grouped, whatever its flag says.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.apply_and_logic && self.and_group > 0
    }

    /// The AND-group this rule belongs to, if it is grouped.
    #[must_use]
    pub fn group(&self) -> Option<u32> {
        self.is_grouped().then_some(self.and_group)
    }
}
