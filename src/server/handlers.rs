//! HTTP request handlers
//!
//! Axum handlers for the model registry API. Registry calls hit SQLite and
//! run on the blocking pool.

use crate::cli::logging::{format_event, log_error, log_event};
use crate::cli::LogLevel;
use crate::registry::{self, Registry, RegistryError};
use crate::server::{
    state::AppState, AddModelQuery, ApiResponse, HealthResponse, ModelIdRequest, ModelListing,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

/// Generate a request ID
fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

/// HTTP status for a registry failure.
pub fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::InvalidVariant(_)
        | RegistryError::InvalidHyperparameters(_)
        | RegistryError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::NotTrained(_) | RegistryError::Conflict(_) => StatusCode::CONFLICT,
        RegistryError::DataUnavailable(_) | RegistryError::StoreUnavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Run a registry call on the blocking pool.
async fn blocking<T, F>(state: &AppState, op: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce(&Registry) -> registry::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let registry = Arc::clone(&state.registry);
    match tokio::task::spawn_blocking(move || op(&registry)).await {
        Ok(result) => result.map_err(|e| (status_for(&e), e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Worker failed: {e}"))),
    }
}

fn reply<T>(
    state: &AppState,
    event: &str,
    req_id: &str,
    model_id: &str,
    result: Result<T, (StatusCode, String)>,
) -> Reply<T> {
    match result {
        Ok(data) => {
            log_event(
                state.log_level,
                LogLevel::Normal,
                event,
                &[("request_id", req_id), ("model_id", model_id), ("status", "ok")],
            );
            (StatusCode::OK, Json(ApiResponse::success(data, req_id)))
        }
        Err((status, message)) => {
            log_error(&format_event(
                event,
                &[
                    ("request_id", req_id),
                    ("model_id", model_id),
                    ("status", status.as_str()),
                    ("error", message.as_str()),
                ],
            ));
            (status, Json(ApiResponse::error(&message, req_id)))
        }
    }
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let count = blocking(&state, |registry| registry.count_models()).await;
    let (status, label, models_count) = match count {
        Ok(n) => (StatusCode::OK, "healthy", Some(n)),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "degraded", None),
    };

    let health = HealthResponse {
        status: label.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        models_count,
    };

    (status, Json(health))
}

/// `GET /openapi.json`
pub async fn openapi_spec() -> Json<serde_json::Value> {
    Json(crate::server::openapi_document())
}

/// `POST /model/add?model_name=&model_params=`
pub async fn add_model(
    State(state): State<AppState>,
    Query(query): Query<AddModelQuery>,
) -> Reply<String> {
    let req_id = request_id();
    let AddModelQuery { model_name, model_params } = query;

    let result = blocking(&state, move |registry| {
        registry.add_model(&model_name, model_params.as_deref())
    })
    .await;

    let model_id = result.as_ref().map(|added| added.model_id.clone()).unwrap_or_default();
    reply(&state, "model.add", &req_id, &model_id, result.map(|added| added.message))
}

/// `GET /model/list`
pub async fn list_models(State(state): State<AppState>) -> Reply<ModelListing> {
    let req_id = request_id();
    let result = blocking(&state, |registry| registry.list_models()).await;
    reply(&state, "model.list", &req_id, "", result.map(ModelListing::from))
}

/// `DELETE /model/delete {model_id}`
pub async fn delete_model(
    State(state): State<AppState>,
    Json(payload): Json<ModelIdRequest>,
) -> Reply<String> {
    let req_id = request_id();
    let model_id = payload.model_id;
    let id = model_id.clone();
    let result = blocking(&state, move |registry| registry.delete_model(&id)).await;
    reply(&state, "model.delete", &req_id, &model_id, result)
}

/// `POST /model/train {model_id}`
pub async fn train_model(
    State(state): State<AppState>,
    Json(payload): Json<ModelIdRequest>,
) -> Reply<String> {
    let req_id = request_id();
    let model_id = payload.model_id;
    let id = model_id.clone();
    let result = blocking(&state, move |registry| registry.train_model(&id)).await;

    if let Ok(trained) = &result {
        let version = trained.model_version.to_string();
        log_event(
            state.log_level,
            LogLevel::Verbose,
            "model.fit",
            &[
                ("request_id", req_id.as_str()),
                ("detail", trained.fit_message.as_str()),
                ("model_version", version.as_str()),
            ],
        );
    }
    reply(&state, "model.train", &req_id, &model_id, result.map(|trained| trained.message))
}

/// `POST /model/predict {model_id}`
pub async fn predict_model(
    State(state): State<AppState>,
    Json(payload): Json<ModelIdRequest>,
) -> Reply<Vec<i64>> {
    let req_id = request_id();
    let model_id = payload.model_id;
    let id = model_id.clone();
    let result = blocking(&state, move |registry| registry.predict_model(&id)).await;
    reply(&state, "model.predict", &req_id, &model_id, result)
}
