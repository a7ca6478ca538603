//! Router and server lifecycle

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::registry::Registry;
use crate::server::{handlers, AppState, Result, ServerConfig, ServerError};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;

/// Build the API router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(handlers::openapi_spec))
        .route("/model/add", post(handlers::add_model))
        .route("/model/list", get(handlers::list_models))
        .route("/model/delete", delete(handlers::delete_model))
        .route("/model/train", post(handlers::train_model))
        .route("/model/predict", post(handlers::predict_model))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .with_state(state)
}

/// HTTP server over a registry.
pub struct ModelServer {
    config: ServerConfig,
    state: AppState,
}

impl ModelServer {
    pub fn new(config: ServerConfig, registry: Registry, log_level: LogLevel) -> Self {
        Self { config, state: AppState::new(registry, log_level) }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.address)
            .await
            .map_err(|e| ServerError::Bind(format!("{}: {e}", self.config.address)))?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        let level = self.state.log_level;
        log(level, LogLevel::Normal, &format!("Listening on http://{local}"));

        let app = router(self.state, &self.config);
        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

        log(level, LogLevel::Normal, "Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
