use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::CatalogError;
use super::territory::AgreementProfile;

/// Closed set of qualification tests a rule can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlternativeKind {
    #[serde(rename = "CTH")]
    ChangeOfTariffHeading,
    #[serde(rename = "CTSH")]
    ChangeOfTariffSubheading,
    #[serde(rename = "V")]
    ValueContent,
    #[serde(rename = "PROCESS")]
    Process,
}

impl AlternativeKind {
    pub const fn code(self) -> &'static str {
        match self {
            AlternativeKind::ChangeOfTariffHeading => "CTH",
            AlternativeKind::ChangeOfTariffSubheading => "CTSH",
            AlternativeKind::ValueContent => "V",
            AlternativeKind::Process => "PROCESS",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AlternativeKind::ChangeOfTariffHeading => "Change in Tariff Heading",
            AlternativeKind::ChangeOfTariffSubheading => "Change in Tariff Subheading",
            AlternativeKind::ValueContent => "Value-Content",
            AlternativeKind::Process => "Process",
        }
    }
}

/// One qualification alternative with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleAlternativeSpec {
    #[serde(rename = "CTH")]
    ChangeOfTariffHeading,
    #[serde(rename = "CTSH")]
    ChangeOfTariffSubheading,
    #[serde(rename = "V", rename_all = "camelCase")]
    ValueContent { max_non_originating_pct: f64 },
    #[serde(rename = "PROCESS", rename_all = "camelCase")]
    Process { required_processes: Vec<String> },
}

impl RuleAlternativeSpec {
    pub const fn kind(&self) -> AlternativeKind {
        match self {
            RuleAlternativeSpec::ChangeOfTariffHeading => AlternativeKind::ChangeOfTariffHeading,
            RuleAlternativeSpec::ChangeOfTariffSubheading => {
                AlternativeKind::ChangeOfTariffSubheading
            }
            RuleAlternativeSpec::ValueContent { .. } => AlternativeKind::ValueContent,
            RuleAlternativeSpec::Process { .. } => AlternativeKind::Process,
        }
    }
}

/// Product-specific rule governing an HS chapter, heading or subheading under one agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginRule {
    pub id: String,
    pub agreement: String,
    pub prefix: String,
    #[serde(default)]
    pub description: String,
    pub alternatives: Vec<RuleAlternativeSpec>,
}

impl OriginRule {
    /// Number of HS digits the rule is registered for; longer is more specific.
    pub fn specificity(&self) -> usize {
        self.prefix.len()
    }

    pub fn matches(&self, hs_code: &str, agreement: &str) -> bool {
        self.agreement == agreement.trim() && hs_code.trim().starts_with(self.prefix.as_str())
    }
}

/// Immutable lookup table of origin rules and originating territories.
///
/// Built once at startup and shared behind an `Arc`; no evaluation path mutates it.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    version: String,
    agreements: BTreeMap<String, AgreementProfile>,
    rules: Vec<OriginRule>,
}

impl RuleRepository {
    pub fn new(
        version: impl Into<String>,
        agreements: Vec<AgreementProfile>,
        rules: Vec<OriginRule>,
    ) -> Result<Self, CatalogError> {
        let mut profiles = BTreeMap::new();
        for profile in agreements {
            let profile = profile.normalized();
            if profiles.contains_key(&profile.id) {
                return Err(CatalogError::DuplicateAgreement(profile.id));
            }
            profiles.insert(profile.id.clone(), profile);
        }

        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(rules.len());
        for mut rule in rules {
            rule.agreement = rule.agreement.trim().to_string();
            rule.prefix = rule.prefix.trim().to_string();
            validate_rule(&rule, &profiles)?;
            if !seen.insert(rule.id.clone()) {
                return Err(CatalogError::DuplicateRule(rule.id));
            }
            validated.push(rule);
        }

        let repository = Self {
            version: version.into(),
            agreements: profiles,
            rules: validated,
        };
        debug!(
            version = %repository.version,
            agreements = repository.agreements.len(),
            rules = repository.rules.len(),
            "rule repository built"
        );
        Ok(repository)
    }

    /// Rules registered for the agreement whose prefix matches `hs_code`, most specific
    /// first; ties keep registration order. Empty when nothing applies.
    pub fn lookup(&self, hs_code: &str, agreement: &str) -> Vec<&OriginRule> {
        let mut matches: Vec<&OriginRule> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(hs_code, agreement))
            .collect();
        matches.sort_by_key(|rule| std::cmp::Reverse(rule.specificity()));
        matches
    }

    pub fn territories(&self, agreement: &str) -> Option<&AgreementProfile> {
        self.agreements.get(agreement.trim())
    }

    pub fn agreements(&self) -> impl Iterator<Item = &AgreementProfile> {
        self.agreements.values()
    }

    pub fn rules(&self) -> &[OriginRule] {
        &self.rules
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

fn validate_rule(
    rule: &OriginRule,
    profiles: &BTreeMap<String, AgreementProfile>,
) -> Result<(), CatalogError> {
    if !profiles.contains_key(&rule.agreement) {
        return Err(CatalogError::UnknownAgreement {
            rule: rule.id.clone(),
            agreement: rule.agreement.clone(),
        });
    }

    let digits_only = rule.prefix.bytes().all(|byte| byte.is_ascii_digit());
    if !digits_only || !matches!(rule.prefix.len(), 2 | 4 | 6) {
        return Err(CatalogError::InvalidPrefix {
            rule: rule.id.clone(),
            prefix: rule.prefix.clone(),
        });
    }

    if rule.alternatives.is_empty() {
        return Err(CatalogError::EmptyRule(rule.id.clone()));
    }

    for alternative in &rule.alternatives {
        match alternative {
            RuleAlternativeSpec::ValueContent {
                max_non_originating_pct,
            } => {
                if !(0.0..=100.0).contains(max_non_originating_pct) {
                    return Err(CatalogError::InvalidThreshold {
                        rule: rule.id.clone(),
                        value: *max_non_originating_pct,
                    });
                }
            }
            RuleAlternativeSpec::Process { required_processes } => {
                if required_processes
                    .iter()
                    .all(|process| process.trim().is_empty())
                {
                    return Err(CatalogError::EmptyProcessList(rule.id.clone()));
                }
            }
            RuleAlternativeSpec::ChangeOfTariffHeading
            | RuleAlternativeSpec::ChangeOfTariffSubheading => {}
        }
    }

    Ok(())
}
