use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use time::Date;

use super::context::PricingContext;
use super::error::BuildError;
use super::ids::{CategoryId, ProductId, RuleId, TemplateId, UomId};
use super::order::{OrderLineSnapshot, OrderSnapshot};
use super::report::ReductionReport;
use super::rule::PricelistRule;
use crate::pass::{PriceComposer, PricingPass};
use crate::RuleMatcher;

/// Builder for constructing a [`Pricelist`].
///
/// # Example
///
/// ```
/// use andgroup::{PricelistBuilder, ProductId};
/// use rust_decimal::Decimal;
///
/// let pricelist = PricelistBuilder::new()
///     .rule(1, |r| r.product(ProductId(10)).min_quantity(Decimal::TWO).and_group(1))
///     .rule(2, |r| r.product(ProductId(20)).and_group(1))
///     .rule(3, |r| r.product(ProductId(30)))
///     .build()
///     .unwrap();
///
/// assert!(pricelist.has_and_groups());
/// ```
#[derive(Debug, Default)]
pub struct PricelistBuilder {
    rules: Vec<PricelistRule>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug)]
pub struct RuleBuilder {
    rule: PricelistRule,
}

impl PricelistBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. Without any criteria set the rule matches everything.
    #[must_use]
    pub fn rule(mut self, id: impl Into<RuleId>, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            rule: PricelistRule::new(id.into()),
        });
        self.rules.push(builder.rule);
        self
    }

    /// Add a rule already loaded from the host store.
    #[must_use]
    pub fn push(mut self, rule: PricelistRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn extend(mut self, rules: impl IntoIterator<Item = PricelistRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Validate the rules and freeze them into a `Pricelist`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if validation fails.
    pub fn build(self) -> Result<Pricelist, BuildError> {
        crate::build::build(self.rules)
    }
}

impl RuleBuilder {
    #[must_use]
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.rule.sequence = sequence;
        self
    }

    #[must_use]
    pub fn product(mut self, product: ProductId) -> Self {
        self.rule.product = Some(product);
        self
    }

    #[must_use]
    pub fn template(mut self, template: TemplateId) -> Self {
        self.rule.template = Some(template);
        self
    }

    #[must_use]
    pub fn category(mut self, category: CategoryId) -> Self {
        self.rule.category = Some(category);
        self
    }

    #[must_use]
    pub fn min_quantity(mut self, quantity: Decimal) -> Self {
        self.rule.min_quantity = Some(quantity);
        self
    }

    /// Unit the minimum quantity is expressed in.
    #[must_use]
    pub fn uom(mut self, uom: UomId) -> Self {
        self.rule.uom = Some(uom);
        self
    }

    #[must_use]
    pub fn valid_from(mut self, date: Date) -> Self {
        self.rule.date_start = Some(date);
        self
    }

    #[must_use]
    pub fn valid_until(mut self, date: Date) -> Self {
        self.rule.date_end = Some(date);
        self
    }

    /// Put the rule in AND-group `group`, setting the AND flag as well.
    #[must_use]
    pub fn and_group(mut self, group: u32) -> Self {
        self.rule.apply_and_logic = true;
        self.rule.and_group = group;
        self
    }

    /// Set the AND flag alone, leaving the group number untouched.
    #[must_use]
    pub fn and_logic(mut self, enabled: bool) -> Self {
        self.rule.apply_and_logic = enabled;
        self
    }

    /// Set the group number alone, leaving the AND flag untouched.
    #[must_use]
    pub fn group_number(mut self, group: u32) -> Self {
        self.rule.and_group = group;
        self
    }
}

/// A validated, immutable set of pricelist rules. Thread-safe and designed
/// to live behind `Arc`.
///
/// Rules are kept in `(sequence, id)` order, the order in which a pricing
/// engine considers them.
#[derive(Debug, Clone)]
pub struct Pricelist {
    pub(crate) rules: Vec<PricelistRule>,
    /// Member rule ids of every AND-group, ascending.
    pub(crate) groups: BTreeMap<u32, Vec<RuleId>>,
}

impl Pricelist {
    #[must_use]
    pub fn rules(&self) -> &[PricelistRule] {
        &self.rules
    }

    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&PricelistRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule takes part in AND-group evaluation. When `false`,
    /// every reduction returns all rules.
    #[must_use]
    pub fn has_and_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// AND-groups and their member rule ids.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<u32, Vec<RuleId>> {
        &self.groups
    }

    /// Rules allowed to take part in pricing lines of `order`.
    ///
    /// `order` must hold every product line of the order, not only the
    /// line being priced.
    #[must_use]
    pub fn applicable_rules<M>(
        &self,
        matcher: &M,
        order: &OrderSnapshot,
        ctx: &PricingContext,
    ) -> Vec<&PricelistRule>
    where
        M: RuleMatcher + ?Sized,
    {
        crate::evaluate::reduce(&self.rules, order.lines(), ctx, matcher)
    }

    /// Reduce with per-group diagnostics.
    pub fn reduce_detailed<M>(
        &self,
        matcher: &M,
        order: &OrderSnapshot,
        ctx: &PricingContext,
    ) -> ReductionReport
    where
        M: RuleMatcher + ?Sized,
    {
        crate::evaluate::reduce_detailed(&self.rules, order.lines(), ctx, matcher)
    }

    /// Start a pricing pass over one order: groups are decided once and
    /// shared by every line priced through the pass.
    pub fn pricing_pass<'a, M>(
        &'a self,
        matcher: &'a M,
        order: &'a OrderSnapshot,
        ctx: PricingContext,
    ) -> PricingPass<'a, M>
    where
        M: RuleMatcher + ?Sized,
    {
        PricingPass::new(self, matcher, order, ctx)
    }

    /// The first applicable rule, in sequence order, that matches `line`.
    ///
    /// Recomputes group validity from `order`; use [`pricing_pass`](Self::pricing_pass)
    /// when pricing several lines of the same order.
    #[must_use]
    pub fn rule_for_line<'a, M>(
        &'a self,
        matcher: &'a M,
        order: &'a OrderSnapshot,
        line: &OrderLineSnapshot,
        ctx: &PricingContext,
    ) -> Option<&'a PricelistRule>
    where
        M: RuleMatcher + ?Sized,
    {
        self.pricing_pass(matcher, order, *ctx).winning_rule(line)
    }

    /// Hand the applicable rules and `line` to `composer`.
    pub fn price_line<P, M>(
        &self,
        composer: &P,
        matcher: &M,
        order: &OrderSnapshot,
        line: &OrderLineSnapshot,
        ctx: &PricingContext,
    ) -> P::Output
    where
        P: PriceComposer + ?Sized,
        M: RuleMatcher + ?Sized,
    {
        self.pricing_pass(matcher, order, *ctx).price_line(composer, line)
    }
}

impl fmt::Display for Pricelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pricelist({} rules, {} AND-groups)",
            self.rules.len(),
            self.groups.len(),
        )
    }
}
