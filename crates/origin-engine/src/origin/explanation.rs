use super::domain::{AlternativeDetail, OriginRequest, RuleAlternativeResult};
use super::policy::Verdict;
use super::quality::DataQualityIssue;
use super::rules::OriginRule;

pub(crate) fn no_rule_message(request: &OriginRequest) -> String {
    format!(
        "No applicable origin rules found for HS code {} under agreement {}.",
        request.hs_code.trim(),
        request.trade_agreement.trim()
    )
}

/// Render the rationale for an evaluated request.
pub(crate) fn explain(
    request: &OriginRequest,
    verdict: &Verdict<'_>,
    alternatives: &[RuleAlternativeResult],
    issues: &[DataQualityIssue],
) -> String {
    let rules = rule_list(&verdict.applied);
    let deciding = alternatives
        .iter()
        .filter(|alternative| verdict.applies(&alternative.rule))
        .filter(|alternative| alternative.result == verdict.is_conform)
        .map(describe)
        .collect::<Vec<_>>()
        .join("; ");

    let mut text = if verdict.is_conform {
        format!(
            "Product {} (HS {}) qualifies as originating under {} {rules}. Passing alternatives: {deciding}.",
            request.product_sku.trim(),
            request.hs_code.trim(),
            request.trade_agreement.trim(),
        )
    } else {
        format!(
            "Product {} (HS {}) does not qualify as originating under {} {rules}. Failed alternatives: {deciding}.",
            request.product_sku.trim(),
            request.hs_code.trim(),
            request.trade_agreement.trim(),
        )
    };

    if !verdict.overridden.is_empty() {
        text.push_str(&format!(
            " Less specific {} would be satisfied, but the more specific rule takes precedence.",
            rule_list(&verdict.overridden)
        ));
    }

    if !issues.is_empty() {
        let notes = issues
            .iter()
            .map(DataQualityIssue::describe)
            .collect::<Vec<_>>()
            .join("; ");
        text.push_str(&format!(" Data quality: {notes}."));
    }

    text
}

fn rule_list(rules: &[&OriginRule]) -> String {
    let ids = rules
        .iter()
        .map(|rule| rule.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if rules.len() == 1 {
        format!("rule {ids}")
    } else {
        format!("rules {ids}")
    }
}

fn describe(alternative: &RuleAlternativeResult) -> String {
    let label = alternative.kind.label();
    if let Some(reason) = alternative.detail.reason() {
        return format!("{label} alternative not satisfied: {reason}");
    }

    match &alternative.detail {
        AlternativeDetail::ValueContent(detail) => {
            let relation = if alternative.result {
                "is within"
            } else {
                "exceeds"
            };
            format!(
                "{label} alternative: {:.1}% non-originating content {relation} the {}% limit",
                detail.non_originating_pct, detail.max_non_originating_pct
            )
        }
        AlternativeDetail::TariffShift(detail) => {
            let level = detail.level.label();
            let code = detail.product_code.as_deref().unwrap_or("?");
            if alternative.result {
                format!("{label} alternative: no non-originating material is classified in {level} {code}")
            } else {
                format!(
                    "{label} alternative: non-originating material(s) {} share {level} {code} with the product",
                    detail.conflicting_materials.join(", ")
                )
            }
        }
        AlternativeDetail::Process(detail) => match &detail.matched_process {
            Some(matched) => {
                format!("{label} alternative: declared process '{matched}' confers origin")
            }
            None => format!(
                "{label} alternative: none of the declared processes ({}) is a required process ({})",
                detail.declared_processes.join(", "),
                detail.required_processes.join(", ")
            ),
        },
    }
}
