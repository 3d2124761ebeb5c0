use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::ids::RuleId;

/// Verdict for one AND-group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Every member rule matched at least one order line.
    Valid,
    /// `rule` matched no order line. Members after it were not evaluated,
    /// so which rule is named depends on member order; the verdict does not.
    Unmatched { rule: RuleId },
    /// The order had no product lines, so the group could not be proven.
    NoOrderContext,
}

impl GroupOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, GroupOutcome::Valid)
    }
}

impl fmt::Display for GroupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOutcome::Valid => write!(f, "valid"),
            GroupOutcome::Unmatched { rule } => write!(f, "unmatched {rule}"),
            GroupOutcome::NoOrderContext => write!(f, "no order context"),
        }
    }
}

/// Detailed result of a group reduction, returned by
/// [`reduce_detailed()`](crate::reduce_detailed) and
/// [`Pricelist::reduce_detailed()`](super::Pricelist::reduce_detailed).
#[derive(Debug, Clone)]
#[must_use]
pub struct ReductionReport {
    kept: Vec<RuleId>,
    groups: BTreeMap<u32, GroupOutcome>,
    duration: Duration,
}

impl ReductionReport {
    pub(crate) fn new(
        kept: Vec<RuleId>,
        groups: BTreeMap<u32, GroupOutcome>,
        duration: Duration,
    ) -> Self {
        Self {
            kept,
            groups,
            duration,
        }
    }

    /// Ids of the rules that survived, in input order.
    #[must_use]
    pub fn kept(&self) -> &[RuleId] {
        &self.kept
    }

    /// Outcome of every AND-group seen, keyed by group number.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<u32, GroupOutcome> {
        &self.groups
    }

    /// `None` if no grouped rule carries this number.
    #[must_use]
    pub fn group(&self, group: u32) -> Option<GroupOutcome> {
        self.groups.get(&group).copied()
    }

    #[must_use]
    pub fn valid_groups(&self) -> Vec<u32> {
        self.groups
            .iter()
            .filter(|(_, outcome)| outcome.is_valid())
            .map(|(&group, _)| group)
            .collect()
    }

    #[must_use]
    pub fn rejected_groups(&self) -> Vec<u32> {
        self.groups
            .iter()
            .filter(|(_, outcome)| !outcome.is_valid())
            .map(|(&group, _)| group)
            .collect()
    }

    /// Wall-clock duration of the reduction.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for ReductionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kept: Vec<String> = self.kept.iter().map(ToString::to_string).collect();
        write!(f, "kept: [{}]", kept.join(", "))?;
        let groups: Vec<String> = self
            .groups
            .iter()
            .map(|(group, outcome)| format!("{group}: {outcome}"))
            .collect();
        write!(f, ", groups: {{{}}}", groups.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
