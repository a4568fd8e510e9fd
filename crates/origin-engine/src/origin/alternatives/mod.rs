//! Stateless evaluators, one per qualification test.
//!
//! Every evaluator reads the request and the agreement's territory set, never fails, and
//! reports missing data as a failed test with a `reason` in its detail.

mod process;
mod tariff_shift;
mod value_content;

pub use process::ProcessDetail;
pub use tariff_shift::{TariffLevel, TariffShiftDetail};
pub use value_content::ValueContentDetail;

pub(crate) use value_content::measure;

use super::domain::{AlternativeDetail, OriginRequest, RuleAlternativeResult};
use super::rules::{OriginRule, RuleAlternativeSpec};
use super::territory::AgreementProfile;

pub(crate) const NO_MATERIALS_REASON: &str = "no materials provided";

pub(crate) fn evaluate_alternative(
    rule: &OriginRule,
    spec: &RuleAlternativeSpec,
    request: &OriginRequest,
    profile: &AgreementProfile,
) -> RuleAlternativeResult {
    let (result, detail) = match spec {
        RuleAlternativeSpec::ChangeOfTariffHeading => {
            let (passed, detail) = tariff_shift::evaluate(request, profile, TariffLevel::Heading);
            (passed, AlternativeDetail::TariffShift(detail))
        }
        RuleAlternativeSpec::ChangeOfTariffSubheading => {
            let (passed, detail) =
                tariff_shift::evaluate(request, profile, TariffLevel::Subheading);
            (passed, AlternativeDetail::TariffShift(detail))
        }
        RuleAlternativeSpec::ValueContent {
            max_non_originating_pct,
        } => {
            let (passed, detail) =
                value_content::evaluate(request, profile, *max_non_originating_pct);
            (passed, AlternativeDetail::ValueContent(detail))
        }
        RuleAlternativeSpec::Process { required_processes } => {
            let (passed, detail) = process::evaluate(request, required_processes);
            (passed, AlternativeDetail::Process(detail))
        }
    };

    RuleAlternativeResult {
        rule: rule.id.clone(),
        kind: spec.kind(),
        result,
        detail,
    }
}
