use std::sync::Arc;

use chrono::NaiveDate;
use origin_engine::origin::{
    AgreementProfile, AlternativeKind, Material, OriginEngine, OriginRequest, OriginRule,
    RuleAlternativeSpec, RuleCatalog, RuleRepository,
};

fn material(hs_code: &str, origin: &str, value: f64, percentage: f64) -> Material {
    Material {
        hs_code: hs_code.to_string(),
        origin: origin.to_string(),
        value,
        percentage,
    }
}

fn ceta_polymer(materials: Vec<Material>) -> OriginRequest {
    OriginRequest {
        product_sku: "PE-FILM-01".to_string(),
        hs_code: "390110".to_string(),
        trade_agreement: "CETA".to_string(),
        product_value: 1000.0,
        materials,
        manufacturing_processes: Vec::new(),
    }
}

fn engine() -> OriginEngine {
    OriginEngine::builtin().expect("built-in catalog is valid")
}

#[test]
fn local_content_polymer_qualifies_under_ceta() {
    let request = ceta_polymer(vec![
        material("390120", "EU", 600.0, 60.0),
        material("290110", "CA", 200.0, 20.0),
        material("381230", "CN", 200.0, 20.0),
    ]);

    let result = engine().calculate_origin(&request).expect("valid request");

    assert!(result.is_conform);
    assert!(result.confidence > 0.5);
    assert_eq!(result.applied_rules.len(), 1);
    assert!(result
        .alternatives
        .iter()
        .any(|alternative| alternative.kind == AlternativeKind::ValueContent && alternative.result));
    assert!(result.calculations.max_nom <= 40.0);
}

#[test]
fn imported_polymer_fails_under_ceta() {
    let request = ceta_polymer(vec![
        material("390120", "CN", 600.0, 60.0),
        material("290110", "MX", 250.0, 25.0),
        material("381230", "US", 150.0, 15.0),
    ]);

    let result = engine().calculate_origin(&request).expect("valid request");

    assert!(!result.is_conform);
    assert!(result.confidence < 0.6);
    assert!(result.alternatives.iter().any(|alternative| {
        alternative.kind == AlternativeKind::ValueContent && !alternative.result
    }));
}

#[test]
fn unknown_code_and_agreement_find_no_rule() {
    let mut request = ceta_polymer(Vec::new());
    request.hs_code = "999999".to_string();
    request.trade_agreement = "Unknown".to_string();

    let result = engine().calculate_origin(&request).expect("valid request");

    assert!(!result.is_conform);
    assert!(result.applied_rules.is_empty());
    assert!(result.explanation.contains("No applicable origin rules"));
}

#[test]
fn repeated_evaluation_is_byte_identical() {
    let engine = engine();
    let request = ceta_polymer(vec![
        material("390120", "EU", 550.0, 50.0),
        material("290110", "CN", 450.0, 45.0),
    ]);

    let first = serde_json::to_vec(&engine.calculate_origin(&request).expect("valid"))
        .expect("serializes");
    let second = serde_json::to_vec(&engine.calculate_origin(&request).expect("valid"))
        .expect("serializes");

    assert_eq!(first, second);
}

#[test]
fn usmca_machinery_uses_its_own_territories() {
    let request = OriginRequest {
        product_sku: "PUMP-12".to_string(),
        hs_code: "841370".to_string(),
        trade_agreement: "USMCA".to_string(),
        product_value: 500.0,
        materials: vec![
            material("730640", "MX", 300.0, 60.0),
            material("850110", "DE", 200.0, 40.0),
        ],
        manufacturing_processes: Vec::new(),
    };

    let result = engine().calculate_origin(&request).expect("valid request");

    assert!(result.is_conform);
    assert_eq!(result.applied_rules[0].id, "USMCA-84");
    assert_eq!(result.calculations.originating_value, 300.0);
    assert_eq!(result.calculations.max_nom, 40.0);
}

#[test]
fn injected_fixture_repository_replaces_catalog() {
    let profile = AgreementProfile {
        id: "FTA".to_string(),
        name: "Fixture agreement".to_string(),
        territory_version: "1".to_string(),
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        territories: ["AA".to_string()].into_iter().collect(),
    };
    let rule = OriginRule {
        id: "FTA-61".to_string(),
        agreement: "FTA".to_string(),
        prefix: "61".to_string(),
        description: "Knitted apparel".to_string(),
        alternatives: vec![RuleAlternativeSpec::Process {
            required_processes: vec!["Knitting".to_string()],
        }],
    };
    let repository =
        RuleRepository::new("fixture", vec![profile], vec![rule]).expect("repository builds");
    let engine = OriginEngine::new(Arc::new(repository));

    let request = OriginRequest {
        product_sku: "TEE-01".to_string(),
        hs_code: "610910".to_string(),
        trade_agreement: "FTA".to_string(),
        product_value: 20.0,
        materials: vec![material("520512", "ZZ", 8.0, 40.0)],
        manufacturing_processes: vec!["knitting".to_string()],
    };

    let result = engine.calculate_origin(&request).expect("valid request");
    assert!(result.is_conform);
    assert_eq!(result.calculations.max_nom, 40.0);
    assert!(result.explanation.contains("FTA-61"));
}

#[test]
fn builtin_catalog_round_trips_through_json() {
    let catalog = RuleCatalog::builtin().expect("built-in catalog parses");
    let json = serde_json::to_string(&catalog).expect("serializes");
    let reparsed = RuleCatalog::from_json(&json).expect("reparses");
    assert_eq!(catalog, reparsed);
    reparsed.into_repository().expect("still validates");
}
