use std::collections::BTreeMap;
use std::time::Instant;

use crate::{
    GroupOutcome, MatchInput, OrderLineSnapshot, PricelistRule, PricingContext, ReductionReport,
    RuleMatcher,
};

/// Outcome of every AND-group in a rule set, keyed by group number.
pub(crate) type GroupVerdicts = BTreeMap<u32, GroupOutcome>;

/// Reduce `rules` to the ones allowed to take part in pricing.
///
/// Ungrouped rules always pass. A grouped rule passes only when every rule
/// sharing its group matches at least one of `lines`; different rules may
/// be satisfied by different lines. When no rule is grouped the input is
/// returned unchanged, and when `lines` is empty every grouped rule is
/// dropped. The result keeps the input order.
#[must_use]
pub fn reduce<'r, M>(
    rules: &'r [PricelistRule],
    lines: &[OrderLineSnapshot],
    ctx: &PricingContext,
    matcher: &M,
) -> Vec<&'r PricelistRule>
where
    M: RuleMatcher + ?Sized,
{
    let verdicts = evaluate_groups(rules, lines, ctx, matcher);
    admitted(rules, &verdicts).collect()
}

/// Like [`reduce`], but reports the outcome of each group and the time
/// taken.
pub fn reduce_detailed<M>(
    rules: &[PricelistRule],
    lines: &[OrderLineSnapshot],
    ctx: &PricingContext,
    matcher: &M,
) -> ReductionReport
where
    M: RuleMatcher + ?Sized,
{
    let start = Instant::now();
    let verdicts = evaluate_groups(rules, lines, ctx, matcher);
    let kept = admitted(rules, &verdicts).map(|rule| rule.id).collect();
    ReductionReport::new(kept, verdicts, start.elapsed())
}

/// Rules of `rules` that survive `verdicts`, in input order.
pub(crate) fn admitted<'r, 'v>(
    rules: &'r [PricelistRule],
    verdicts: &'v GroupVerdicts,
) -> impl Iterator<Item = &'r PricelistRule> + 'v
where
    'r: 'v,
{
    rules.iter().filter(move |rule| match rule.group() {
        None => true,
        Some(group) => verdicts.get(&group).is_some_and(GroupOutcome::is_valid),
    })
}

/// Decide every AND-group present in `rules`.
pub(crate) fn evaluate_groups<M>(
    rules: &[PricelistRule],
    lines: &[OrderLineSnapshot],
    ctx: &PricingContext,
    matcher: &M,
) -> GroupVerdicts
where
    M: RuleMatcher + ?Sized,
{
    let mut groups: BTreeMap<u32, Vec<&PricelistRule>> = BTreeMap::new();
    for rule in rules {
        if let Some(group) = rule.group() {
            groups.entry(group).or_default().push(rule);
        }
    }

    if groups.is_empty() {
        return GroupVerdicts::new();
    }

    if lines.is_empty() {
        tracing::debug!(
            groups = groups.len(),
            "no order lines; dropping every AND-group"
        );
        return groups
            .into_keys()
            .map(|group| (group, GroupOutcome::NoOrderContext))
            .collect();
    }

    let inputs: Vec<MatchInput> = lines
        .iter()
        .map(|line| MatchInput::from_line(line, ctx))
        .collect();

    groups
        .into_iter()
        .map(|(group, members)| {
            let outcome = check_group(&members, &inputs, matcher);
            match outcome {
                GroupOutcome::Valid => {
                    tracing::debug!(group, members = members.len(), "AND-group satisfied");
                }
                _ => {
                    tracing::debug!(group, %outcome, "AND-group rejected");
                }
            }
            (group, outcome)
        })
        .collect()
}

/// A group is valid when each member finds some line it matches. Stops at
/// the first member that finds none.
fn check_group<M>(members: &[&PricelistRule], inputs: &[MatchInput], matcher: &M) -> GroupOutcome
where
    M: RuleMatcher + ?Sized,
{
    for rule in members {
        let matched = inputs.iter().any(|input| matcher.matches(rule, input));
        if !matched {
            return GroupOutcome::Unmatched { rule: rule.id };
        }
    }
    GroupOutcome::Valid
}
