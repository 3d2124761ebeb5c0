use crate::evaluate::{admitted, evaluate_groups, GroupVerdicts};
use crate::{
    GroupOutcome, MatchInput, OrderLineSnapshot, OrderSnapshot, Pricelist, PricelistRule,
    PricingContext, RuleMatcher,
};

/// Turns the reduced rule set into a price for one line.
///
/// This crate performs no price arithmetic; a host implements this trait
/// over its own fixed/percentage/formula engine. Rules arrive in
/// `(sequence, id)` order.
pub trait PriceComposer {
    type Output;

    fn compose(
        &self,
        rules: &[&PricelistRule],
        line: &OrderLineSnapshot,
        ctx: &PricingContext,
    ) -> Self::Output;
}

impl<F, O> PriceComposer for F
where
    F: Fn(&[&PricelistRule], &OrderLineSnapshot, &PricingContext) -> O,
{
    type Output = O;

    fn compose(
        &self,
        rules: &[&PricelistRule],
        line: &OrderLineSnapshot,
        ctx: &PricingContext,
    ) -> O {
        self(rules, line, ctx)
    }
}

/// The rule picked for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAssignment<'a> {
    pub line: &'a OrderLineSnapshot,
    pub rule: Option<&'a PricelistRule>,
}

/// One pricing pass over one order.
///
/// Group validity is decided once, against the full order snapshot, and
/// reused for every line. The results are the same as recomputing per
/// line; the pass only avoids the repeated work. A pass borrows the
/// snapshot, so an edited order needs a fresh snapshot and a fresh pass.
#[derive(Debug)]
pub struct PricingPass<'a, M: ?Sized> {
    matcher: &'a M,
    order: &'a OrderSnapshot,
    ctx: PricingContext,
    verdicts: GroupVerdicts,
    applicable: Vec<&'a PricelistRule>,
}

impl<'a, M> PricingPass<'a, M>
where
    M: RuleMatcher + ?Sized,
{
    pub(crate) fn new(
        pricelist: &'a Pricelist,
        matcher: &'a M,
        order: &'a OrderSnapshot,
        ctx: PricingContext,
    ) -> Self {
        let verdicts = evaluate_groups(&pricelist.rules, order.lines(), &ctx, matcher);
        let applicable = admitted(&pricelist.rules, &verdicts).collect();
        Self {
            matcher,
            order,
            ctx,
            verdicts,
            applicable,
        }
    }

    /// Rules that survived group evaluation, in `(sequence, id)` order.
    #[must_use]
    pub fn applicable_rules(&self) -> &[&'a PricelistRule] {
        &self.applicable
    }

    /// Outcome of an AND-group, `None` if no rule carries that number.
    #[must_use]
    pub fn group(&self, group: u32) -> Option<GroupOutcome> {
        self.verdicts.get(&group).copied()
    }

    #[must_use]
    pub fn context(&self) -> &PricingContext {
        &self.ctx
    }

    /// The first applicable rule that matches `line`.
    #[must_use]
    pub fn winning_rule(&self, line: &OrderLineSnapshot) -> Option<&'a PricelistRule> {
        let input = MatchInput::from_line(line, &self.ctx);
        let winner = self
            .applicable
            .iter()
            .copied()
            .find(|rule| self.matcher.matches(rule, &input));
        tracing::trace!(
            product = %line.product,
            rule = ?winner.map(|r| r.id),
            "line assigned"
        );
        winner
    }

    /// The winning rule for every line of the order, in line order.
    #[must_use]
    pub fn assignments(&self) -> Vec<LineAssignment<'a>> {
        self.order
            .lines()
            .iter()
            .map(|line| LineAssignment {
                line,
                rule: self.winning_rule(line),
            })
            .collect()
    }

    pub fn price_line<P>(&self, composer: &P, line: &OrderLineSnapshot) -> P::Output
    where
        P: PriceComposer + ?Sized,
    {
        composer.compose(&self.applicable, line, &self.ctx)
    }

    /// Price every line of the order, in line order.
    pub fn price_order<P>(&self, composer: &P) -> Vec<P::Output>
    where
        P: PriceComposer + ?Sized,
    {
        self.order
            .lines()
            .iter()
            .map(|line| self.price_line(composer, line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{PricelistBuilder, ProductId, RuleId};

    fn by_product(rule: &PricelistRule, input: &MatchInput) -> bool {
        rule.product.map_or(true, |p| p == input.product)
            && rule.min_quantity.map_or(true, |min| input.quantity >= min)
    }

    fn pricelist() -> Pricelist {
        PricelistBuilder::new()
            .rule(1, |r| r.product(ProductId(10)).and_group(1).sequence(1))
            .rule(2, |r| r.product(ProductId(20)).and_group(1).sequence(2))
            .rule(3, |r| r.product(ProductId(10)).sequence(3))
            .rule(4, |r| r.sequence(99))
            .build()
            .unwrap()
    }

    fn order(products: &[u64]) -> OrderSnapshot {
        products
            .iter()
            .map(|&p| OrderLineSnapshot::new(ProductId(p), dec!(1)))
            .collect()
    }

    #[test]
    fn winning_rule_prefers_valid_group() {
        let pricelist = pricelist();
        let order = order(&[10, 20]);
        let pass = pricelist.pricing_pass(&by_product, &order, PricingContext::new());

        assert_eq!(pass.group(1), Some(GroupOutcome::Valid));
        let winners: Vec<Option<u64>> = pass
            .assignments()
            .iter()
            .map(|a| a.rule.map(|r| r.id.0))
            .collect();
        assert_eq!(winners, vec![Some(1), Some(2)]);
    }

    #[test]
    fn invalid_group_falls_back_to_ungrouped() {
        let pricelist = pricelist();
        let order = order(&[10, 30]);
        let pass = pricelist.pricing_pass(&by_product, &order, PricingContext::new());

        assert_eq!(
            pass.group(1),
            Some(GroupOutcome::Unmatched { rule: RuleId(2) })
        );
        let winners: Vec<Option<u64>> = pass
            .assignments()
            .iter()
            .map(|a| a.rule.map(|r| r.id.0))
            .collect();
        assert_eq!(winners, vec![Some(3), Some(4)]);
    }

    #[test]
    fn pass_matches_per_line_recompute() {
        let pricelist = pricelist();
        let order = order(&[10, 20, 30]);
        let ctx = PricingContext::new();
        let pass = pricelist.pricing_pass(&by_product, &order, ctx);

        for line in order.lines() {
            assert_eq!(
                pass.winning_rule(line),
                pricelist.rule_for_line(&by_product, &order, line, &ctx)
            );
        }
    }

    #[test]
    fn composer_receives_applicable_rules() {
        let pricelist = pricelist();
        let order = order(&[10]);
        let composer = |rules: &[&PricelistRule], line: &OrderLineSnapshot, _: &PricingContext| {
            (line.product, rules.iter().map(|r| r.id.0).collect::<Vec<_>>())
        };
        let pass = pricelist.pricing_pass(&by_product, &order, PricingContext::new());

        let priced = pass.price_order(&composer);
        assert_eq!(priced, vec![(ProductId(10), vec![3, 4])]);
    }

    #[test]
    fn price_line_equals_pass_price_line() {
        let pricelist = pricelist();
        let order = order(&[10, 20]);
        let ctx = PricingContext::new();
        let composer = |rules: &[&PricelistRule], _: &OrderLineSnapshot, _: &PricingContext| {
            rules.len()
        };
        let line = &order.lines()[0];

        let direct = pricelist.price_line(&composer, &by_product, &order, line, &ctx);
        let pass = pricelist
            .pricing_pass(&by_product, &order, ctx)
            .price_line(&composer, line);
        assert_eq!(direct, 4);
        assert_eq!(direct, pass);
    }
}
