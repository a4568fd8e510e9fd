use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::rules::{OriginRule, RuleRepository};
use super::territory::AgreementProfile;
use crate::config::EngineConfig;

const BUILTIN_CATALOG: &str = include_str!("../../data/rules_of_origin.json");

/// Errors raised while loading or validating a rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rule catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule catalog document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("agreement {0} is declared more than once")]
    DuplicateAgreement(String),
    #[error("rule id {0} is declared more than once")]
    DuplicateRule(String),
    #[error("rule {rule} references agreement {agreement} without an originating-territory set")]
    UnknownAgreement { rule: String, agreement: String },
    #[error("rule {rule} has HS prefix '{prefix}' (expected 2, 4 or 6 digits)")]
    InvalidPrefix { rule: String, prefix: String },
    #[error("rule {0} declares no qualification alternative")]
    EmptyRule(String),
    #[error("rule {rule} declares a value threshold of {value} outside 0..=100")]
    InvalidThreshold { rule: String, value: f64 },
    #[error("rule {0} declares a process alternative without any process")]
    EmptyProcessList(String),
}

/// Serialized form of the rule tables: agreements with their territories, then rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCatalog {
    pub version: String,
    pub agreements: Vec<AgreementProfile>,
    pub rules: Vec<OriginRule>,
}

impl RuleCatalog {
    /// Catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn into_repository(self) -> Result<RuleRepository, CatalogError> {
        RuleRepository::new(self.version, self.agreements, self.rules)
    }
}

impl RuleRepository {
    pub fn builtin() -> Result<Self, CatalogError> {
        RuleCatalog::builtin()?.into_repository()
    }

    /// Build the repository from the configured catalog path, or the built-in catalog.
    pub fn from_config(config: &EngineConfig) -> Result<Self, CatalogError> {
        let (catalog, source) = match &config.rules_path {
            Some(path) => (RuleCatalog::from_path(path)?, path.display().to_string()),
            None => (RuleCatalog::builtin()?, "built-in".to_string()),
        };

        let repository = catalog.into_repository()?;
        info!(
            %source,
            version = repository.version(),
            rules = repository.rules().len(),
            "origin rule catalog loaded"
        );
        Ok(repository)
    }
}
