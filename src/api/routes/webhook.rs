//! Video provider webhook endpoint.

use crate::api::error::ApiResult;
use crate::webhook::{WebhookRequest, WebhookService};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct WebhookState {
    pub service: Arc<WebhookService>,
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/api/webhook", post(receive_webhook))
        .with_state(state)
}

/// POST /api/webhook - Verify and dispatch a provider event.
async fn receive_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let request = WebhookRequest {
        signature: header_value(&headers, SIGNATURE_HEADER),
        api_key: header_value(&headers, API_KEY_HEADER),
        body: &body,
    };

    let outcome = state.service.handle(request).await?;
    debug!("Webhook handled: {:?}", outcome);

    Ok(Json(json!({ "status": "ok" })))
}

/// Non-UTF-8 header values are treated as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
