use crate::infra::{agreement_catalog, AgreementCatalogView, AppState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use origin_engine::error::AppError;
use origin_engine::origin::{OriginEngine, OriginError, OriginRequest, OriginResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) requests: Vec<OriginRequest>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub(crate) enum BatchEntry {
    Evaluated {
        result: Box<OriginResult>,
    },
    Rejected {
        error: String,
        field: String,
    },
}

impl From<Result<OriginResult, OriginError>> for BatchEntry {
    fn from(value: Result<OriginResult, OriginError>) -> Self {
        match value {
            Ok(result) => BatchEntry::Evaluated {
                result: Box::new(result),
            },
            Err(err) => {
                let message = err.to_string();
                let OriginError::InvalidRequest { field, .. } = err;
                BatchEntry::Rejected {
                    error: message,
                    field,
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) results: Vec<BatchEntry>,
}

pub(crate) fn origin_routes(engine: Arc<OriginEngine>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/origin/calculate", post(calculate_endpoint))
        .route("/api/v1/origin/batch", post(batch_endpoint))
        .route("/api/v1/origin/agreements", get(agreements_endpoint))
        .with_state(engine)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn calculate_endpoint(
    State(engine): State<Arc<OriginEngine>>,
    Json(request): Json<OriginRequest>,
) -> Result<Json<OriginResult>, AppError> {
    let result = engine.calculate_origin(&request)?;
    Ok(Json(result))
}

pub(crate) async fn batch_endpoint(
    State(engine): State<Arc<OriginEngine>>,
    Json(payload): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let count = payload.requests.len();
    let results = tokio::task::spawn_blocking(move || engine.calculate_batch(&payload.requests))
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    info!(requests = count, "origin batch evaluated");
    Ok(Json(BatchResponse {
        results: results.into_iter().map(BatchEntry::from).collect(),
    }))
}

pub(crate) async fn agreements_endpoint(
    State(engine): State<Arc<OriginEngine>>,
) -> Json<AgreementCatalogView> {
    Json(agreement_catalog(engine.repository()))
}
