use serde::{Deserialize, Serialize};

use crate::origin::domain::OriginRequest;

pub(crate) const NO_PROCESSES_REASON: &str = "no manufacturingProcesses provided";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDetail {
    pub required_processes: Vec<String>,
    pub declared_processes: Vec<String>,
    pub matched_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub(crate) fn evaluate(request: &OriginRequest, required: &[String]) -> (bool, ProcessDetail) {
    let declared: Vec<String> = request
        .manufacturing_processes
        .iter()
        .map(|process| process.trim().to_string())
        .filter(|process| !process.is_empty())
        .collect();

    let required_keys: Vec<String> = required
        .iter()
        .map(|process| process.trim().to_lowercase())
        .filter(|process| !process.is_empty())
        .collect();

    let matched_process = declared
        .iter()
        .find(|process| required_keys.contains(&process.to_lowercase()))
        .cloned();

    let reason = declared
        .is_empty()
        .then(|| NO_PROCESSES_REASON.to_string());

    let passed = matched_process.is_some();
    let detail = ProcessDetail {
        required_processes: required.to_vec(),
        declared_processes: declared,
        matched_process,
        reason,
    };
    (passed, detail)
}
