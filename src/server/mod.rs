//! REST/HTTP API for the model registry.
//!
//! # Example
//!
//! ```ignore
//! use heartml::server::{ModelServer, ServerConfig};
//!
//! let server = ModelServer::new(ServerConfig::default(), registry, LogLevel::Normal);
//! server.run().await?;
//! ```

mod api;
mod handlers;
mod openapi;
mod state;

pub use api::{router, ModelServer};
pub use handlers::*;
pub use openapi::document as openapi_document;
pub use state::AppState;

use crate::storage::ModelSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use thiserror::Error;

/// Listing sentinel when the store holds no models.
pub const NO_MODELS: &str = "No models added";

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bind error: {0}")]
    Bind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server address
    pub address: SocketAddr,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_body_size: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create config with custom address
    pub fn with_address(mut self, addr: SocketAddr) -> Self {
        self.address = addr;
        self
    }
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Request ID for tracing
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T, request_id: &str) -> Self {
        Self { success: true, data: Some(data), error: None, request_id: request_id.to_string() }
    }

    /// Create error response
    pub fn error(message: &str, request_id: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
            request_id: request_id.to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status
    pub status: String,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Stored models, if the store answered
    pub models_count: Option<usize>,
}

/// Query string of `POST /model/add`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddModelQuery {
    /// Variant name
    pub model_name: String,
    /// JSON object text of hyperparameters
    pub model_params: Option<String>,
}

/// Body of delete, train and predict requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelIdRequest {
    pub model_id: String,
}

/// `GET /model/list` payload: the id → metadata map, or the sentinel text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelListing {
    Models(BTreeMap<String, ModelSummary>),
    Empty(String),
}

impl From<BTreeMap<String, ModelSummary>> for ModelListing {
    fn from(models: BTreeMap<String, ModelSummary>) -> Self {
        if models.is_empty() {
            ModelListing::Empty(NO_MODELS.to_string())
        } else {
            ModelListing::Models(models)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, trained: bool) -> ModelSummary {
        ModelSummary {
            model_name: name.to_string(),
            model_params: "{}".to_string(),
            model_is_trained: trained,
        }
    }

    #[test]
    fn test_default_listens_on_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.address.port(), 5000);
        assert!(config.address.ip().is_loopback());
        assert_eq!(config.max_body_size, 64 * 1024);
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success("Model 1 deleted", "req-a"))
            .expect("operation should succeed");
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], "Model 1 deleted");
        assert!(ok["error"].is_null());
        assert_eq!(ok["request_id"], "req-a");

        let err = serde_json::to_value(ApiResponse::<()>::error("No such model", "req-b"))
            .expect("operation should succeed");
        assert_eq!(err["success"], false);
        assert!(err["data"].is_null());
        assert_eq!(err["error"], "No such model");
    }

    #[test]
    fn test_add_query_params_optional() {
        let query: AddModelQuery =
            serde_json::from_str(r#"{"model_name": "svc"}"#).expect("operation should succeed");
        assert_eq!(query.model_name, "svc");
        assert!(query.model_params.is_none());
    }

    #[test]
    fn test_empty_listing_is_sentinel() {
        let listing = ModelListing::from(BTreeMap::new());
        let json = serde_json::to_string(&listing).expect("operation should succeed");
        assert_eq!(json, "\"No models added\"");
    }

    #[test]
    fn test_listing_is_plain_map() {
        let mut models = BTreeMap::new();
        models.insert("id-1".to_string(), summary("logreg", false));
        let json = serde_json::to_value(ModelListing::from(models)).expect("operation should succeed");
        assert_eq!(json["id-1"]["model_name"], "logreg");
        assert_eq!(json["id-1"]["model_is_trained"], false);
    }

    #[test]
    fn test_health_without_store() {
        let health = HealthResponse {
            status: "degraded".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: 3,
            models_count: None,
        };
        let json = serde_json::to_value(&health).expect("operation should succeed");
        assert!(json["models_count"].is_null());
        assert_eq!(json["status"], "degraded");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_listing_keeps_every_id(ids in proptest::collection::btree_set("[a-f0-9]{8}", 1..10)) {
            let models: BTreeMap<String, ModelSummary> = ids
                .iter()
                .map(|id| (id.clone(), ModelSummary {
                    model_name: "svc".to_string(),
                    model_params: "{}".to_string(),
                    model_is_trained: true,
                }))
                .collect();
            let json = serde_json::to_value(ModelListing::from(models)).unwrap();
            let object = json.as_object().unwrap();
            prop_assert_eq!(object.len(), ids.len());
            for id in &ids {
                prop_assert!(object.contains_key(id));
            }
        }

        #[test]
        fn prop_model_id_request_roundtrip(id in "[a-f0-9-]{1,36}") {
            let json = serde_json::to_string(&ModelIdRequest { model_id: id.clone() }).unwrap();
            let parsed: ModelIdRequest = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed.model_id, id);
        }
    }
}
