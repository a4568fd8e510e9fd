use serde::{Deserialize, Serialize};

use super::NO_MATERIALS_REASON;
use crate::origin::domain::{hs_prefix, OriginRequest};
use crate::origin::territory::AgreementProfile;

/// Classification depth a tariff-shift test compares at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffLevel {
    Heading,
    Subheading,
}

impl TariffLevel {
    pub const fn digits(self) -> usize {
        match self {
            TariffLevel::Heading => 4,
            TariffLevel::Subheading => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TariffLevel::Heading => "heading",
            TariffLevel::Subheading => "subheading",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffShiftDetail {
    pub level: TariffLevel,
    pub product_code: Option<String>,
    /// Non-originating materials classified in the product's own heading/subheading.
    pub conflicting_materials: Vec<String>,
    /// Non-originating materials whose code is too short or not numeric.
    pub unclassified_materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub(crate) fn evaluate(
    request: &OriginRequest,
    profile: &AgreementProfile,
    level: TariffLevel,
) -> (bool, TariffShiftDetail) {
    let digits = level.digits();
    let mut detail = TariffShiftDetail {
        level,
        product_code: None,
        conflicting_materials: Vec::new(),
        unclassified_materials: Vec::new(),
        reason: None,
    };

    let Some(product_code) = hs_prefix(&request.hs_code, digits) else {
        detail.reason = Some(format!(
            "product HS code {} has fewer than {digits} digits",
            request.hs_code.trim()
        ));
        return (false, detail);
    };
    detail.product_code = Some(product_code.to_string());

    if request.materials.is_empty() {
        detail.reason = Some(NO_MATERIALS_REASON.to_string());
        return (false, detail);
    }

    for material in request
        .materials
        .iter()
        .filter(|material| !profile.is_originating(&material.origin))
    {
        match hs_prefix(&material.hs_code, digits) {
            Some(code) if code == product_code => detail
                .conflicting_materials
                .push(material.hs_code.trim().to_string()),
            Some(_) => {}
            None => detail
                .unclassified_materials
                .push(material.hs_code.trim().to_string()),
        }
    }

    if detail.conflicting_materials.is_empty() && !detail.unclassified_materials.is_empty() {
        detail.reason = Some(format!(
            "{} non-originating material(s) cannot be classified at {} level",
            detail.unclassified_materials.len(),
            level.label()
        ));
    }

    let passed =
        detail.conflicting_materials.is_empty() && detail.unclassified_materials.is_empty();
    (passed, detail)
}
