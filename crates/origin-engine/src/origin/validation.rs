use std::ops::RangeInclusive;

use super::domain::OriginRequest;

/// Accepted length of a product HS code: subheading up to national tariff line.
const PRODUCT_HS_DIGITS: RangeInclusive<usize> = 6..=10;

/// Raised only for requests whose shape cannot be evaluated at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OriginError {
    #[error("invalid origin request: {field} {reason}")]
    InvalidRequest { field: String, reason: String },
}

impl OriginError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OriginError::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn validate_request(request: &OriginRequest) -> Result<(), OriginError> {
    require_text("productSku", &request.product_sku)?;
    require_text("tradeAgreement", &request.trade_agreement)?;

    let hs_code = request.hs_code.trim();
    if !PRODUCT_HS_DIGITS.contains(&hs_code.len())
        || !hs_code.bytes().all(|byte| byte.is_ascii_digit())
    {
        return Err(OriginError::invalid(
            "hsCode",
            "must be a string of 6 to 10 digits",
        ));
    }

    require_finite("productValue", request.product_value)?;

    for (index, material) in request.materials.iter().enumerate() {
        require_text(&format!("materials[{index}].hsCode"), &material.hs_code)?;
        require_text(&format!("materials[{index}].origin"), &material.origin)?;
        require_finite(&format!("materials[{index}].value"), material.value)?;
        require_finite(&format!("materials[{index}].percentage"), material.percentage)?;
        if material.value < 0.0 {
            return Err(OriginError::invalid(
                format!("materials[{index}].value"),
                "must not be negative",
            ));
        }
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), OriginError> {
    if value.trim().is_empty() {
        Err(OriginError::invalid(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), OriginError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OriginError::invalid(field, "must be a finite number"))
    }
}
