//! HTTP server for meetai.
//!
//! Provides endpoints for:
//! - Video provider webhooks
//! - Avatar images
//! - Service info

pub mod error;
pub mod routes;

use crate::webhook::WebhookService;
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

pub use routes::webhook::WebhookState;

/// Build the full application router.
pub fn router(service: Arc<WebhookService>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/version", get(version))
        .merge(routes::webhook::router(WebhookState { service }))
        .merge(routes::avatar::router())
        .layer(ServiceBuilder::new())
}

pub struct ApiServer {
    address: String,
    service: Arc<WebhookService>,
}

impl ApiServer {
    pub fn new(address: impl Into<String>, service: Arc<WebhookService>) -> Self {
        Self {
            address: address.into(),
            service,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.service);

        let listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .with_context(|| format!("Failed to bind {}", self.address))?;

        info!("API server listening on http://{}", self.address);
        info!("Endpoints:");
        info!("  GET  /              - Service info");
        info!("  GET  /version       - Get version info");
        info!("  POST /api/webhook   - Video provider webhook");
        info!("  GET  /avatar        - Generate avatar SVG (?seed=&variant=)");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "meetai",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "meetai"
    }))
}
