use serde::{Deserialize, Serialize};

use super::NO_MATERIALS_REASON;
use crate::origin::domain::OriginRequest;
use crate::origin::territory::AgreementProfile;

/// Share reported when the percentage cannot be computed.
const FAIL_SAFE_PCT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueContentDetail {
    pub non_originating_pct: f64,
    pub max_non_originating_pct: f64,
    pub non_originating_value: f64,
    pub originating_value: f64,
    pub product_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Originating / non-originating split of the declared material values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContentMeasure {
    pub originating_value: f64,
    pub non_originating_value: f64,
    pub non_originating_pct: f64,
    pub reason: Option<String>,
}

/// Split material values by origin. Without a territory set nothing counts as originating.
pub(crate) fn measure(request: &OriginRequest, profile: Option<&AgreementProfile>) -> ContentMeasure {
    let (originating_value, non_originating_value) =
        request
            .materials
            .iter()
            .fold((0.0, 0.0), |(originating, non_originating), material| {
                let counts = profile
                    .map(|profile| profile.is_originating(&material.origin))
                    .unwrap_or(false);
                if counts {
                    (originating + material.value, non_originating)
                } else {
                    (originating, non_originating + material.value)
                }
            });

    let (non_originating_pct, reason) = if request.materials.is_empty() {
        (FAIL_SAFE_PCT, Some(NO_MATERIALS_REASON.to_string()))
    } else if request.product_value <= 0.0 {
        (
            FAIL_SAFE_PCT,
            Some(format!(
                "product value {:.2} is not positive; non-originating share treated as 100%",
                request.product_value
            )),
        )
    } else {
        (non_originating_value / request.product_value * 100.0, None)
    };

    ContentMeasure {
        originating_value,
        non_originating_value,
        non_originating_pct,
        reason,
    }
}

pub(crate) fn evaluate(
    request: &OriginRequest,
    profile: &AgreementProfile,
    max_non_originating_pct: f64,
) -> (bool, ValueContentDetail) {
    let measure = measure(request, Some(profile));
    let passed = measure.reason.is_none() && measure.non_originating_pct <= max_non_originating_pct;

    let detail = ValueContentDetail {
        non_originating_pct: measure.non_originating_pct,
        max_non_originating_pct,
        non_originating_value: measure.non_originating_value,
        originating_value: measure.originating_value,
        product_value: request.product_value,
        reason: measure.reason,
    };
    (passed, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::domain::Material;
    use chrono::NaiveDate;

    fn ceta() -> AgreementProfile {
        AgreementProfile {
            id: "CETA".to_string(),
            name: "CETA".to_string(),
            territory_version: "test".to_string(),
            effective_from: NaiveDate::from_ymd_opt(2017, 9, 21).expect("valid date"),
            territories: ["CA", "EU"].iter().map(|c| c.to_string()).collect(),
        }
    }

    fn material(origin: &str, value: f64) -> Material {
        Material {
            hs_code: "390120".to_string(),
            origin: origin.to_string(),
            value,
            percentage: value / 10.0,
        }
    }

    fn request(product_value: f64, materials: Vec<Material>) -> OriginRequest {
        OriginRequest {
            product_sku: "SKU".to_string(),
            hs_code: "390110".to_string(),
            trade_agreement: "CETA".to_string(),
            product_value,
            materials,
            manufacturing_processes: Vec::new(),
        }
    }

    #[test]
    fn sums_non_originating_share_from_values() {
        let request = request(
            1000.0,
            vec![material("EU", 600.0), material("CA", 200.0), material("CN", 200.0)],
        );
        let (passed, detail) = evaluate(&request, &ceta(), 40.0);
        assert!(passed);
        assert_eq!(detail.non_originating_pct, 20.0);
        assert_eq!(detail.originating_value, 800.0);
        assert_eq!(detail.non_originating_value, 200.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let request = request(1000.0, vec![material("CN", 400.0), material("CA", 600.0)]);
        let (passed, detail) = evaluate(&request, &ceta(), 40.0);
        assert!(passed);
        assert_eq!(detail.non_originating_pct, 40.0);
    }

    #[test]
    fn value_wins_over_drifting_percentage() {
        let mut drifting = material("CN", 500.0);
        drifting.percentage = 5.0;
        let request = request(1000.0, vec![drifting, material("CA", 500.0)]);
        let (passed, detail) = evaluate(&request, &ceta(), 40.0);
        assert!(!passed);
        assert_eq!(detail.non_originating_pct, 50.0);
    }

    #[test]
    fn non_positive_product_value_fails_safe() {
        let request = request(0.0, vec![material("CA", 100.0)]);
        let (passed, detail) = evaluate(&request, &ceta(), 40.0);
        assert!(!passed);
        assert_eq!(detail.non_originating_pct, FAIL_SAFE_PCT);
        assert!(detail.reason.expect("reason").contains("not positive"));
    }

    #[test]
    fn empty_bill_of_materials_counts_as_uncovered() {
        let (passed, detail) = evaluate(&request(1000.0, Vec::new()), &ceta(), 40.0);
        assert!(!passed);
        assert_eq!(detail.non_originating_pct, FAIL_SAFE_PCT);
        assert_eq!(detail.reason.as_deref(), Some(NO_MATERIALS_REASON));
    }

    #[test]
    fn share_stays_finite_for_large_values() {
        let request = request(2e307, vec![material("CN", 8e306), material("CA", 1.2e307)]);
        let (passed, detail) = evaluate(&request, &ceta(), 50.0);
        assert!(detail.non_originating_pct.is_finite());
        assert!((detail.non_originating_pct - 40.0).abs() < 1e-9);
        assert!(passed);
    }

    #[test]
    fn unknown_agreement_counts_everything_as_non_originating() {
        let request = request(1000.0, vec![material("CA", 250.0)]);
        let measure = measure(&request, None);
        assert_eq!(measure.originating_value, 0.0);
        assert_eq!(measure.non_originating_pct, 25.0);
    }
}
