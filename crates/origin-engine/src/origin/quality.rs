use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{AlternativeDetail, OriginRequest, RuleAlternativeResult};
use super::rules::AlternativeKind;

/// Allowed gap, in percentage points, between declared and computed shares.
pub(crate) const PERCENTAGE_TOLERANCE: f64 = 1.0;

/// Input problem that lowers confidence without changing the verdict path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataQualityIssue {
    EmptyBillOfMaterials,
    #[serde(rename_all = "camelCase")]
    NonPositiveProductValue { product_value: f64 },
    #[serde(rename_all = "camelCase")]
    PercentageDrift { declared_total: f64 },
    #[serde(rename_all = "camelCase")]
    MaterialShareDrift {
        hs_code: String,
        declared: f64,
        computed: f64,
    },
    MissingManufacturingProcesses,
    #[serde(rename_all = "camelCase")]
    UnclassifiedMaterial { hs_code: String },
}

/// Groups issues that share a confidence penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum IssueCategory {
    EmptyBillOfMaterials,
    NonPositiveProductValue,
    Percentages,
    MissingProcesses,
    Classification,
}

impl DataQualityIssue {
    pub(crate) fn category(&self) -> IssueCategory {
        match self {
            DataQualityIssue::EmptyBillOfMaterials => IssueCategory::EmptyBillOfMaterials,
            DataQualityIssue::NonPositiveProductValue { .. } => {
                IssueCategory::NonPositiveProductValue
            }
            DataQualityIssue::PercentageDrift { .. }
            | DataQualityIssue::MaterialShareDrift { .. } => IssueCategory::Percentages,
            DataQualityIssue::MissingManufacturingProcesses => IssueCategory::MissingProcesses,
            DataQualityIssue::UnclassifiedMaterial { .. } => IssueCategory::Classification,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataQualityIssue::EmptyBillOfMaterials => "no materials were provided".to_string(),
            DataQualityIssue::NonPositiveProductValue { product_value } => {
                format!("product value {product_value:.2} is not positive")
            }
            DataQualityIssue::PercentageDrift { declared_total } => {
                format!("material percentages sum to {declared_total:.1}% instead of 100%")
            }
            DataQualityIssue::MaterialShareDrift {
                hs_code,
                declared,
                computed,
            } => format!(
                "material {hs_code} declares {declared:.1}% but its value represents {computed:.1}%"
            ),
            DataQualityIssue::MissingManufacturingProcesses => {
                "no manufacturing processes were declared for a process-based alternative"
                    .to_string()
            }
            DataQualityIssue::UnclassifiedMaterial { hs_code } => {
                format!("material code '{hs_code}' cannot be classified")
            }
        }
    }
}

pub(crate) fn declared_percentage_total(request: &OriginRequest) -> f64 {
    request
        .materials
        .iter()
        .map(|material| material.percentage)
        .sum()
}

/// Collect input findings for the request and the alternatives evaluated against it.
pub(crate) fn inspect(
    request: &OriginRequest,
    alternatives: &[RuleAlternativeResult],
) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    if request.materials.is_empty() {
        issues.push(DataQualityIssue::EmptyBillOfMaterials);
    } else {
        let declared_total = declared_percentage_total(request);
        if (declared_total - 100.0).abs() > PERCENTAGE_TOLERANCE {
            issues.push(DataQualityIssue::PercentageDrift { declared_total });
        }
    }

    if request.product_value <= 0.0 {
        issues.push(DataQualityIssue::NonPositiveProductValue {
            product_value: request.product_value,
        });
    } else {
        for material in &request.materials {
            let computed = material.value / request.product_value * 100.0;
            if (material.percentage - computed).abs() > PERCENTAGE_TOLERANCE {
                issues.push(DataQualityIssue::MaterialShareDrift {
                    hs_code: material.hs_code.trim().to_string(),
                    declared: material.percentage,
                    computed,
                });
            }
        }
    }

    let process_evaluated = alternatives
        .iter()
        .any(|alternative| alternative.kind == AlternativeKind::Process);
    let processes_declared = request
        .manufacturing_processes
        .iter()
        .any(|process| !process.trim().is_empty());
    if process_evaluated && !processes_declared {
        issues.push(DataQualityIssue::MissingManufacturingProcesses);
    }

    let unclassified: BTreeSet<&str> = alternatives
        .iter()
        .filter_map(|alternative| match &alternative.detail {
            AlternativeDetail::TariffShift(detail) => Some(&detail.unclassified_materials),
            _ => None,
        })
        .flatten()
        .map(String::as_str)
        .collect();
    issues.extend(
        unclassified
            .into_iter()
            .map(|hs_code| DataQualityIssue::UnclassifiedMaterial {
                hs_code: hs_code.to_string(),
            }),
    );

    issues
}
