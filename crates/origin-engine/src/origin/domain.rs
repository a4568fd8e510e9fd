use serde::{Deserialize, Serialize};

use super::alternatives::{ProcessDetail, TariffShiftDetail, ValueContentDetail};
use super::quality::DataQualityIssue;
use super::rules::{AlternativeKind, OriginRule};

/// One line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub hs_code: String,
    pub origin: String,
    pub value: f64,
    /// Declared share of the product value. `value` stays canonical for content tests.
    #[serde(default)]
    pub percentage: f64,
}

/// Caller-owned input of a single origin determination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginRequest {
    pub product_sku: String,
    pub hs_code: String,
    pub trade_agreement: String,
    pub product_value: f64,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub manufacturing_processes: Vec<String>,
}

/// Outcome of a single qualification alternative, kept for drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAlternativeResult {
    pub rule: String,
    #[serde(rename = "type")]
    pub kind: AlternativeKind,
    pub result: bool,
    pub detail: AlternativeDetail,
}

/// Figures that produced an alternative's boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlternativeDetail {
    TariffShift(TariffShiftDetail),
    ValueContent(ValueContentDetail),
    Process(ProcessDetail),
}

impl AlternativeDetail {
    /// Set when the alternative failed because input data was missing or unusable.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AlternativeDetail::TariffShift(detail) => detail.reason.as_deref(),
            AlternativeDetail::ValueContent(detail) => detail.reason.as_deref(),
            AlternativeDetail::Process(detail) => detail.reason.as_deref(),
        }
    }
}

/// Key derived quantities. `max_nom` is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginCalculations {
    pub max_nom: f64,
    pub originating_value: f64,
    pub non_originating_value: f64,
    pub product_value: f64,
    pub declared_percentage_total: f64,
}

/// Verdict handed back to the caller; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginResult {
    pub is_conform: bool,
    pub confidence: f64,
    pub applied_rules: Vec<OriginRule>,
    pub alternatives: Vec<RuleAlternativeResult>,
    pub calculations: OriginCalculations,
    pub data_quality: Vec<DataQualityIssue>,
    pub explanation: String,
}

/// Leading `digits` of an HS code, if that many ASCII digits are present.
pub(crate) fn hs_prefix(code: &str, digits: usize) -> Option<&str> {
    let code = code.trim();
    let prefix = code.get(..digits)?;
    if prefix.bytes().all(|byte| byte.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}
