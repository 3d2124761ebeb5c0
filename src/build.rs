use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;

use crate::{BuildError, Pricelist, PricelistRule, RuleId};

pub(crate) fn build(mut rules: Vec<PricelistRule>) -> Result<Pricelist, BuildError> {
    check_duplicates(&rules)?;
    for rule in &rules {
        check_window(rule)?;
        check_min_quantity(rule)?;
        note_partial_grouping(rule);
    }

    rules.sort_by_key(|r| (r.sequence, r.id));

    let mut groups: BTreeMap<u32, Vec<RuleId>> = BTreeMap::new();
    for rule in &rules {
        if let Some(group) = rule.group() {
            groups.entry(group).or_default().push(rule.id);
        }
    }
    for members in groups.values_mut() {
        members.sort();
    }

    tracing::debug!(
        rules = rules.len(),
        groups = groups.len(),
        "pricelist built"
    );

    Ok(Pricelist { rules, groups })
}

fn check_duplicates(rules: &[PricelistRule]) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id) {
            return Err(BuildError::DuplicateRule { id: rule.id });
        }
    }
    Ok(())
}

fn check_window(rule: &PricelistRule) -> Result<(), BuildError> {
    match (rule.date_start, rule.date_end) {
        (Some(start), Some(end)) if start > end => Err(BuildError::InvalidDateWindow {
            rule: rule.id,
            start,
            end,
        }),
        _ => Ok(()),
    }
}

fn check_min_quantity(rule: &PricelistRule) -> Result<(), BuildError> {
    match rule.min_quantity {
        Some(min) if min < Decimal::ZERO => Err(BuildError::NegativeMinQuantity { rule: rule.id }),
        _ => Ok(()),
    }
}

/// The flag and the group number only mean something together; either one
/// alone leaves the rule ungrouped.
fn note_partial_grouping(rule: &PricelistRule) {
    if rule.apply_and_logic && rule.and_group == 0 {
        tracing::debug!(rule = %rule.id, "AND flag set without a group; rule stays ungrouped");
    } else if !rule.apply_and_logic && rule.and_group > 0 {
        tracing::debug!(
            rule = %rule.id,
            group = rule.and_group,
            "group number set without the AND flag; rule stays ungrouped"
        );
    }
}
