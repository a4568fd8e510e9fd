//! Confidence in the verdict, derived from threshold margins and input completeness.
//!
//! Each deciding alternative contributes a strength in `[0, 1]`. A passing verdict takes
//! the strongest passing alternative and maps it onto `0.5..=0.95`; a failing verdict takes
//! the weakest failing alternative and maps it onto `0.5..=0.58`, since a negative result
//! only shows that the supplied evidence does not establish origin. Data-quality penalties
//! are subtracted once per category and the result is clamped to `[0.01, 0.99]`.

use std::collections::BTreeSet;

use super::domain::{AlternativeDetail, RuleAlternativeResult};
use super::quality::{DataQualityIssue, IssueCategory};

/// Reported when no rule applies.
pub const NO_RULE_CONFIDENCE: f64 = 0.0;

const MIDPOINT: f64 = 0.5;
const PASS_SPAN: f64 = 0.45;
const FAIL_SPAN: f64 = 0.08;
const FLOOR: f64 = 0.01;
const CEILING: f64 = 0.99;

const TARIFF_SHIFT_STRENGTH: f64 = 0.8;
const PROCESS_STRENGTH: f64 = 0.6;
const MISSING_DATA_STRENGTH: f64 = 0.2;

fn penalty(category: IssueCategory) -> f64 {
    match category {
        IssueCategory::EmptyBillOfMaterials => 0.15,
        IssueCategory::NonPositiveProductValue => 0.15,
        IssueCategory::Percentages => 0.10,
        IssueCategory::MissingProcesses => 0.10,
        IssueCategory::Classification => 0.05,
    }
}

/// Score the verdict from the alternatives of the rules that decided it.
pub(crate) fn score(
    deciding: &[&RuleAlternativeResult],
    is_conform: bool,
    issues: &[DataQualityIssue],
) -> f64 {
    let strengths = deciding
        .iter()
        .filter(|alternative| alternative.result == is_conform)
        .map(|alternative| strength(alternative));

    let base = if is_conform {
        let strength = strengths.fold(0.0, f64::max);
        MIDPOINT + PASS_SPAN * strength
    } else {
        let strength = strengths.fold(None, |weakest: Option<f64>, value| {
            Some(weakest.map_or(value, |current| current.min(value)))
        });
        MIDPOINT + FAIL_SPAN * strength.unwrap_or(0.0)
    };

    let categories: BTreeSet<IssueCategory> = issues.iter().map(DataQualityIssue::category).collect();
    let penalized = base - categories.into_iter().map(penalty).sum::<f64>();

    round(penalized.clamp(FLOOR, CEILING))
}

/// How decisively one alternative landed on its side of the test.
fn strength(alternative: &RuleAlternativeResult) -> f64 {
    if alternative.detail.reason().is_some() {
        return MISSING_DATA_STRENGTH;
    }

    match &alternative.detail {
        AlternativeDetail::ValueContent(detail) => {
            let limit = detail.max_non_originating_pct;
            let pct = detail.non_originating_pct;
            let margin = if alternative.result {
                if limit <= 0.0 {
                    1.0
                } else {
                    (limit - pct) / limit
                }
            } else {
                let span = 100.0 - limit;
                if span <= 0.0 {
                    1.0
                } else {
                    (pct - limit) / span
                }
            };
            margin.clamp(0.0, 1.0)
        }
        AlternativeDetail::TariffShift(_) => TARIFF_SHIFT_STRENGTH,
        AlternativeDetail::Process(_) => PROCESS_STRENGTH,
    }
}

fn round(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
