use super::rules::OriginRule;

/// Whether any alternative of a looked-up rule passed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleOutcome<'a> {
    pub rule: &'a OriginRule,
    pub satisfied: bool,
}

/// Final decision over all evaluated rules.
#[derive(Debug, Clone)]
pub(crate) struct Verdict<'a> {
    pub is_conform: bool,
    /// Rules that determined the verdict.
    pub applied: Vec<&'a OriginRule>,
    /// Less specific rules that were satisfied but lost to a failing specific rule.
    pub overridden: Vec<&'a OriginRule>,
}

impl Verdict<'_> {
    pub fn applies(&self, rule_id: &str) -> bool {
        self.applied.iter().any(|rule| rule.id == rule_id)
    }
}

/// The most specific tier of rules decides; rules within that tier are OR-ed.
pub(crate) fn decide_verdict<'a>(outcomes: &[RuleOutcome<'a>]) -> Verdict<'a> {
    let Some(deciding_specificity) = outcomes
        .iter()
        .map(|outcome| outcome.rule.specificity())
        .max()
    else {
        return Verdict {
            is_conform: false,
            applied: Vec::new(),
            overridden: Vec::new(),
        };
    };

    let (tier, rest): (Vec<&RuleOutcome<'a>>, Vec<&RuleOutcome<'a>>) = outcomes
        .iter()
        .partition(|outcome| outcome.rule.specificity() == deciding_specificity);

    let is_conform = tier.iter().any(|outcome| outcome.satisfied);

    let applied = tier
        .iter()
        .filter(|outcome| !is_conform || outcome.satisfied)
        .map(|outcome| outcome.rule)
        .collect();

    let overridden = if is_conform {
        Vec::new()
    } else {
        rest.iter()
            .filter(|outcome| outcome.satisfied)
            .map(|outcome| outcome.rule)
            .collect()
    };

    Verdict {
        is_conform,
        applied,
        overridden,
    }
}
