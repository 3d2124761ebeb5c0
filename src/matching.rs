use std::cmp::Ordering;

use rust_decimal::Decimal;
use time::Date;

use crate::types::compare_quantities;
use crate::{
    Catalog, OrderLineSnapshot, PartnerId, PricelistRule, PricingContext, Product, ProductId,
    UomId,
};

/// The tuple a rule is tested against: one product at one quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInput {
    pub product: ProductId,
    pub quantity: Decimal,
    pub partner: Option<PartnerId>,
    pub date: Option<Date>,
    /// Unit `quantity` is expressed in. `None` means the product's own unit.
    pub uom: Option<UomId>,
}

impl MatchInput {
    #[must_use]
    pub fn new(product: ProductId, quantity: Decimal) -> Self {
        Self {
            product,
            quantity,
            partner: None,
            date: None,
            uom: None,
        }
    }

    /// The input for one order line, with the request's date and its
    /// default unit filling in for a line that names none.
    #[must_use]
    pub fn from_line(line: &OrderLineSnapshot, ctx: &PricingContext) -> Self {
        Self {
            product: line.product,
            quantity: line.quantity,
            partner: line.partner,
            date: ctx.date(),
            uom: line.uom.or(ctx.fallback_uom()),
        }
    }

    #[must_use]
    pub fn on(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn in_uom(mut self, uom: UomId) -> Self {
        self.uom = Some(uom);
        self
    }
}

/// Decides whether a rule's static criteria accept one product/quantity.
///
/// This is the seam to the host platform's own matching primitives. Any
/// `Fn(&PricelistRule, &MatchInput) -> bool` is a matcher, which keeps
/// tests free of catalog setup.
pub trait RuleMatcher {
    fn matches(&self, rule: &PricelistRule, input: &MatchInput) -> bool;
}

impl<F> RuleMatcher for F
where
    F: Fn(&PricelistRule, &MatchInput) -> bool,
{
    fn matches(&self, rule: &PricelistRule, input: &MatchInput) -> bool {
        self(rule, input)
    }
}

/// [`RuleMatcher`] backed by a [`Catalog`] of products, categories and
/// units.
///
/// Criteria are checked in order and the first failure wins:
///
/// 1. target product
/// 2. target template
/// 3. target category, including every ancestor of the product's category
/// 4. minimum quantity, after converting into the rule's unit
/// 5. start of the validity window
/// 6. end of the validity window
///
/// Missing catalog records never panic; they make the rule not match.
#[derive(Debug, Clone, Copy)]
pub struct CatalogMatcher<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> CatalogMatcher<'a, C> {
    #[must_use]
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    fn meets_minimum(
        &self,
        rule: &PricelistRule,
        product: &Product,
        input: &MatchInput,
        min: Decimal,
    ) -> bool {
        let rule_uom_id = rule.uom.unwrap_or(product.uom);
        let Some(rule_uom) = self.catalog.uom(rule_uom_id) else {
            tracing::debug!(
                rule = %rule.id,
                uom = %rule_uom_id,
                "unknown rule unit; rule does not match"
            );
            return false;
        };

        let line_uom_id = input.uom.unwrap_or(product.uom);
        let quantity = if line_uom_id == rule_uom_id {
            input.quantity
        } else {
            match self.catalog.uom(line_uom_id) {
                Some(line_uom) => match line_uom.convert(input.quantity, rule_uom) {
                    Ok(converted) => converted,
                    Err(err) => {
                        tracing::debug!(rule = %rule.id, %err, "comparing unconverted quantity");
                        input.quantity
                    }
                },
                None => {
                    tracing::debug!(
                        rule = %rule.id,
                        uom = %line_uom_id,
                        "unknown line unit; comparing unconverted quantity"
                    );
                    input.quantity
                }
            }
        };

        compare_quantities(quantity, min, rule_uom.rounding) != Ordering::Less
    }
}

impl<C: Catalog + ?Sized> RuleMatcher for CatalogMatcher<'_, C> {
    fn matches(&self, rule: &PricelistRule, input: &MatchInput) -> bool {
        if rule.product.is_some_and(|target| target != input.product) {
            return false;
        }

        let min_quantity = rule.min_quantity.filter(|min| !min.is_zero());
        let needs_product =
            rule.template.is_some() || rule.category.is_some() || min_quantity.is_some();
        if needs_product {
            let Some(product) = self.catalog.product(input.product) else {
                tracing::trace!(rule = %rule.id, product = %input.product, "product not in catalog");
                return false;
            };

            if rule.template.is_some_and(|target| target != product.template) {
                return false;
            }

            if let Some(target) = rule.category {
                let within = product
                    .category
                    .is_some_and(|category| self.catalog.is_within(category, target));
                if !within {
                    return false;
                }
            }

            if let Some(min) = min_quantity {
                if !self.meets_minimum(rule, product, input, min) {
                    return false;
                }
            }
        }

        if let (Some(start), Some(date)) = (rule.date_start, input.date) {
            if date < start {
                return false;
            }
        }
        if let (Some(end), Some(date)) = (rule.date_end, input.date) {
            if date > end {
                return false;
            }
        }

        true
    }
}
