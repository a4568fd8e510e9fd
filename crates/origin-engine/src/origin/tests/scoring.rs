use super::common::*;

fn confidence_at(pct: f64) -> (bool, f64) {
    let engine = fixture_engine(vec![fixture_rule("FTA-84", "84", vec![value_content(50.0)])]);
    let result = engine
        .calculate_origin(&fixture_request(pct))
        .expect("request is valid");
    (result.is_conform, result.confidence)
}

#[test]
fn pass_confidence_falls_as_non_originating_share_rises() {
    let mut previous = f64::INFINITY;
    for pct in [0.0, 10.0, 20.0, 30.0, 40.0, 50.0] {
        let (is_conform, confidence) = confidence_at(pct);
        assert!(is_conform, "{pct}% should pass a 50% limit");
        assert!(confidence <= previous, "confidence rose at {pct}%");
        assert!(confidence > 0.0 && confidence < 1.0);
        previous = confidence;
    }
    assert_eq!(confidence_at(50.0).1, 0.5);
}

#[test]
fn fail_confidence_rises_with_non_originating_share() {
    let mut previous = f64::NEG_INFINITY;
    for pct in [60.0, 70.0, 80.0, 90.0, 100.0] {
        let (is_conform, confidence) = confidence_at(pct);
        assert!(!is_conform, "{pct}% should fail a 50% limit");
        assert!(confidence >= previous, "confidence fell at {pct}%");
        assert!(confidence < 0.6);
        previous = confidence;
    }
}

#[test]
fn identical_requests_serialize_identically() {
    let engine = builtin_engine();
    let request = non_conforming_request();

    let first = serde_json::to_string(&engine.calculate_origin(&request).expect("valid"))
        .expect("serializes");
    let second = serde_json::to_string(&engine.calculate_origin(&request).expect("valid"))
        .expect("serializes");

    assert_eq!(first, second);
}

#[test]
fn missing_processes_lower_confidence() {
    let engine = builtin_engine();
    let with_processes = engine
        .calculate_origin(&conforming_request())
        .expect("request is valid");

    let mut request = conforming_request();
    request.manufacturing_processes.clear();
    let without_processes = engine.calculate_origin(&request).expect("request is valid");

    assert!(without_processes.is_conform);
    assert!(without_processes.confidence < with_processes.confidence);
    assert!(without_processes.confidence > 0.5);
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let engine = builtin_engine();
    let result = engine
        .calculate_origin(&conforming_request())
        .expect("request is valid");

    let json = serde_json::to_value(&result).expect("serializes");
    assert_eq!(json["isConform"], serde_json::json!(true));
    assert_eq!(json["calculations"]["maxNom"], serde_json::json!(20.0));
    assert_eq!(json["appliedRules"][0]["id"], serde_json::json!("CETA-3901"));
    assert_eq!(json["alternatives"][1]["type"], serde_json::json!("V"));
    assert_eq!(
        json["alternatives"][1]["detail"]["maxNonOriginatingPct"],
        serde_json::json!(40.0)
    );
}
