//! Rules-of-origin determination.
//!
//! `OriginEngine::calculate_origin` resolves the rules registered for the product's HS code
//! under the requested agreement, runs every declared qualification alternative, lets the
//! most specific rule tier decide, then scores and explains the verdict.

mod alternatives;
mod catalog;
mod confidence;
mod domain;
mod explanation;
mod policy;
mod quality;
mod rules;
mod territory;
mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, warn};

pub use alternatives::{ProcessDetail, TariffLevel, TariffShiftDetail, ValueContentDetail};
pub use catalog::{CatalogError, RuleCatalog};
pub use confidence::NO_RULE_CONFIDENCE;
pub use domain::{
    AlternativeDetail, Material, OriginCalculations, OriginRequest, OriginResult,
    RuleAlternativeResult,
};
pub use quality::DataQualityIssue;
pub use rules::{AlternativeKind, OriginRule, RuleAlternativeSpec, RuleRepository};
pub use territory::AgreementProfile;
pub use validation::OriginError;

use alternatives::evaluate_alternative;
use policy::{decide_verdict, RuleOutcome};

/// Stateless evaluator over a shared, read-only rule repository.
#[derive(Debug, Clone)]
pub struct OriginEngine {
    repository: Arc<RuleRepository>,
}

impl OriginEngine {
    pub fn new(repository: Arc<RuleRepository>) -> Self {
        Self { repository }
    }

    /// Engine over the catalog embedded in the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::new(Arc::new(RuleRepository::builtin()?)))
    }

    pub fn repository(&self) -> &RuleRepository {
        &self.repository
    }

    pub fn calculate_origin(&self, request: &OriginRequest) -> Result<OriginResult, OriginError> {
        validation::validate_request(request)?;

        let profile = self.repository.territories(&request.trade_agreement);
        let measure = alternatives::measure(request, profile);
        let calculations = OriginCalculations {
            max_nom: measure.non_originating_pct,
            originating_value: measure.originating_value,
            non_originating_value: measure.non_originating_value,
            product_value: request.product_value,
            declared_percentage_total: quality::declared_percentage_total(request),
        };

        let rules = self
            .repository
            .lookup(&request.hs_code, &request.trade_agreement);
        let profile = match profile {
            Some(profile) if !rules.is_empty() => profile,
            _ => {
                debug!(
                    sku = %request.product_sku,
                    hs_code = %request.hs_code,
                    agreement = %request.trade_agreement,
                    "no applicable origin rule"
                );
                return Ok(OriginResult {
                    is_conform: false,
                    confidence: NO_RULE_CONFIDENCE,
                    applied_rules: Vec::new(),
                    alternatives: Vec::new(),
                    calculations,
                    data_quality: quality::inspect(request, &[]),
                    explanation: explanation::no_rule_message(request),
                });
            }
        };

        let mut trace = Vec::new();
        let mut outcomes = Vec::with_capacity(rules.len());
        for rule in rules.iter().copied() {
            let start = trace.len();
            trace.extend(
                rule.alternatives
                    .iter()
                    .map(|spec| evaluate_alternative(rule, spec, request, profile)),
            );
            let satisfied = trace[start..].iter().any(|alternative| alternative.result);
            outcomes.push(RuleOutcome { rule, satisfied });
        }

        let verdict = decide_verdict(&outcomes);
        let deciding: Vec<&RuleAlternativeResult> = trace
            .iter()
            .filter(|alternative| verdict.applies(&alternative.rule))
            .collect();

        let issues = quality::inspect(request, &trace);
        let confidence = confidence::score(&deciding, verdict.is_conform, &issues);
        let explanation = explanation::explain(request, &verdict, &trace, &issues);

        debug!(
            sku = %request.product_sku,
            agreement = %request.trade_agreement,
            is_conform = verdict.is_conform,
            confidence,
            max_nom = calculations.max_nom,
            "origin evaluated"
        );
        if !issues.is_empty() {
            warn!(
                sku = %request.product_sku,
                findings = issues.len(),
                "origin evaluated with data quality findings"
            );
        }

        Ok(OriginResult {
            is_conform: verdict.is_conform,
            confidence,
            applied_rules: verdict.applied.into_iter().cloned().collect(),
            alternatives: trace,
            calculations,
            data_quality: issues,
            explanation,
        })
    }

    /// Evaluate independent requests; one result per request, in input order.
    pub fn calculate_batch(
        &self,
        requests: &[OriginRequest],
    ) -> Vec<Result<OriginResult, OriginError>> {
        requests
            .iter()
            .map(|request| self.calculate_origin(request))
            .collect()
    }
}
