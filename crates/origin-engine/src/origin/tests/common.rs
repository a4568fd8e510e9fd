use std::sync::Arc;

use chrono::NaiveDate;

use crate::origin::{
    AgreementProfile, Material, OriginEngine, OriginRequest, OriginRule, RuleAlternativeSpec,
    RuleRepository,
};

pub(super) fn builtin_engine() -> OriginEngine {
    OriginEngine::builtin().expect("built-in catalog is valid")
}

pub(super) fn material(hs_code: &str, origin: &str, value: f64) -> Material {
    Material {
        hs_code: hs_code.to_string(),
        origin: origin.to_string(),
        value,
        percentage: value / 10.0,
    }
}

/// CETA polyethylene request over a product value of 1000.
pub(super) fn ceta_request(materials: Vec<Material>, processes: &[&str]) -> OriginRequest {
    OriginRequest {
        product_sku: "PE-FILM-01".to_string(),
        hs_code: "390110".to_string(),
        trade_agreement: "CETA".to_string(),
        product_value: 1000.0,
        materials,
        manufacturing_processes: processes.iter().map(|p| p.to_string()).collect(),
    }
}

pub(super) fn conforming_request() -> OriginRequest {
    ceta_request(
        vec![
            material("390120", "EU", 600.0),
            material("290110", "CA", 200.0),
            material("381230", "CN", 200.0),
        ],
        &["Polymerisation"],
    )
}

pub(super) fn non_conforming_request() -> OriginRequest {
    ceta_request(
        vec![
            material("390120", "CN", 600.0),
            material("290110", "MX", 250.0),
            material("381230", "US", 150.0),
        ],
        &["Compounding", "Extrusion"],
    )
}

pub(super) fn fixture_profile() -> AgreementProfile {
    AgreementProfile {
        id: "FTA".to_string(),
        name: "Fixture agreement".to_string(),
        territory_version: "fixture".to_string(),
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        territories: ["AA", "BB"].iter().map(|code| code.to_string()).collect(),
    }
}

pub(super) fn fixture_rule(
    id: &str,
    prefix: &str,
    alternatives: Vec<RuleAlternativeSpec>,
) -> OriginRule {
    OriginRule {
        id: id.to_string(),
        agreement: "FTA".to_string(),
        prefix: prefix.to_string(),
        description: format!("fixture rule {id}"),
        alternatives,
    }
}

pub(super) fn fixture_engine(rules: Vec<OriginRule>) -> OriginEngine {
    let repository = RuleRepository::new("fixture", vec![fixture_profile()], rules)
        .expect("fixture repository builds");
    OriginEngine::new(Arc::new(repository))
}

pub(super) fn value_content(max_non_originating_pct: f64) -> RuleAlternativeSpec {
    RuleAlternativeSpec::ValueContent {
        max_non_originating_pct,
    }
}

/// Fixture request for HS 847130 whose non-originating share is `pct` percent.
pub(super) fn fixture_request(pct: f64) -> OriginRequest {
    let non_originating = pct * 10.0;
    OriginRequest {
        product_sku: "LAPTOP-7".to_string(),
        hs_code: "847130".to_string(),
        trade_agreement: "FTA".to_string(),
        product_value: 1000.0,
        materials: vec![
            material("854231", "ZZ", non_originating),
            material("847330", "AA", 1000.0 - non_originating),
        ],
        manufacturing_processes: Vec::new(),
    }
}
