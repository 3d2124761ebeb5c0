use time::Date;

use super::ids::UomId;

/// Per-request inputs that are not part of the order itself.
///
/// Both fields are optional: without a date, rule validity windows are not
/// checked; without a default unit, lines that carry no unit are assumed to
/// be counted in their product's own unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingContext {
    date: Option<Date>,
    default_uom: Option<UomId>,
}

impl PricingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate rule validity windows against `date`.
    #[must_use]
    pub fn at(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Unit assumed for lines that do not name one.
    #[must_use]
    pub fn default_uom(mut self, uom: UomId) -> Self {
        self.default_uom = Some(uom);
        self
    }

    #[must_use]
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    #[must_use]
    pub fn fallback_uom(&self) -> Option<UomId> {
        self.default_uom
    }
}
