use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use origin_engine::config::EngineConfig;
use origin_engine::error::AppError;
use origin_engine::origin::{OriginEngine, RuleRepository};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the engine once; every handler shares the same read-only repository.
pub(crate) fn load_engine(config: &EngineConfig) -> Result<Arc<OriginEngine>, AppError> {
    let repository = RuleRepository::from_config(config)?;
    Ok(Arc::new(OriginEngine::new(Arc::new(repository))))
}

/// Public listing of a registered agreement and how many rules it carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AgreementSummary {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) territory_version: String,
    pub(crate) effective_from: NaiveDate,
    pub(crate) territories: Vec<String>,
    pub(crate) rules: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AgreementCatalogView {
    pub(crate) version: String,
    pub(crate) agreements: Vec<AgreementSummary>,
}

pub(crate) fn agreement_catalog(repository: &RuleRepository) -> AgreementCatalogView {
    let agreements = repository
        .agreements()
        .map(|profile| AgreementSummary {
            id: profile.id.clone(),
            name: profile.name.clone(),
            territory_version: profile.territory_version.clone(),
            effective_from: profile.effective_from,
            territories: profile.territories.iter().cloned().collect(),
            rules: repository
                .rules()
                .iter()
                .filter(|rule| rule.agreement == profile.id)
                .count(),
        })
        .collect();

    AgreementCatalogView {
        version: repository.version().to_string(),
        agreements,
    }
}
