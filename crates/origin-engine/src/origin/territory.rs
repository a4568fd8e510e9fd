use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Versioned originating-territory set for one agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementProfile {
    pub id: String,
    pub name: String,
    pub territory_version: String,
    pub effective_from: NaiveDate,
    pub territories: BTreeSet<String>,
}

impl AgreementProfile {
    /// Whether materials from `origin` count as local content under this agreement.
    pub fn is_originating(&self, origin: &str) -> bool {
        let code = origin.trim().to_ascii_uppercase();
        !code.is_empty() && self.territories.contains(&code)
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            territories: self
                .territories
                .iter()
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect(),
            ..self
        }
    }
}
