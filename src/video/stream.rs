use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio_tungstenite::tungstenite::{
    client::IntoClientRequest, handshake::client::Request, http::HeaderValue,
};
use tracing::{debug, error, info};

use super::{
    signature, token, AgentConnectRequest, CallRef, RealtimeClient, RealtimeSession, VideoProvider,
};
use crate::config::StreamConfig;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
    code: Option<i64>,
}

/// Stream Video client: REST for call control, websocket for agent bridging.
pub struct StreamClient {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    base_url: String,
    realtime_url: String,
    realtime_model: String,
    token_ttl_seconds: u64,
}

impl StreamClient {
    pub fn new(config: &StreamConfig, realtime_model: &str) -> Result<Self> {
        if config.api_key.trim().is_empty() || config.api_secret.trim().is_empty() {
            bail!(
                "Video API key and secret must be configured (stream.api_key / stream.api_secret)"
            );
        }

        let client = reqwest::Client::new();
        info!("Initialized video client with endpoint: {}", config.base_url);

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.clone(),
            realtime_url: config.realtime_url.clone(),
            realtime_model: realtime_model.to_string(),
            token_ttl_seconds: config.token_ttl_seconds,
        })
    }

    fn call_action_url(&self, call: &CallRef, action: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).context("Invalid video API base url")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Video API base url cannot have path segments"))?
            .pop_if_empty()
            .extend(["video", "call", call.call_type.as_str(), call.id.as_str(), action]);
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    pub fn realtime_request(
        &self,
        call: &CallRef,
        request: &AgentConnectRequest,
    ) -> Result<Request> {
        let url = Url::parse_with_params(
            &self.realtime_url,
            &[
                ("call_type", call.call_type.as_str()),
                ("call_id", call.id.as_str()),
                ("api_key", self.api_key.as_str()),
                ("model", self.realtime_model.as_str()),
            ],
        )
        .context("Invalid realtime url")?;

        let user_token = token::user_token(
            &self.api_secret,
            &request.agent_user_id,
            self.token_ttl_seconds,
        )?;

        let mut ws_request = url
            .as_str()
            .into_client_request()
            .context("Failed to build realtime request")?;
        let headers = ws_request.headers_mut();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&user_token).context("Invalid agent token header")?,
        );
        headers.insert("stream-auth-type", HeaderValue::from_static("jwt"));
        headers.insert(
            "x-openai-api-key",
            HeaderValue::from_str(&request.openai_api_key).context("Invalid OpenAI key header")?,
        );

        Ok(ws_request)
    }
}

#[async_trait]
impl VideoProvider for StreamClient {
    fn verify_webhook(&self, body: &[u8], signature: &str) -> bool {
        signature::verify(&self.api_secret, body, signature)
    }

    async fn end_call(&self, call: &CallRef) -> Result<()> {
        let url = self.call_action_url(call, "mark_ended")?;
        let server_token = token::server_token(&self.api_secret)?;

        debug!("Ending call {}", call.cid());

        let response = self
            .client
            .post(url)
            .header("Authorization", server_token)
            .header("stream-auth-type", "jwt")
            .json(&serde_json::json!({}))
            .send()
            .await
            .context("Failed to send end call request")?;

        let status = response.status();
        if status.is_success() {
            info!("Ended call {}", call.cid());
            return Ok(());
        }

        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;
        error!(
            "End call request for {} failed with status {}: {}",
            call.cid(),
            status,
            response_text
        );

        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
            bail!(
                "Video API error: {} (code: {:?})",
                error_response.message,
                error_response.code
            );
        }

        bail!("End call request failed with status {}", status)
    }

    async fn connect_openai(
        &self,
        call: &CallRef,
        request: &AgentConnectRequest,
    ) -> Result<Box<dyn RealtimeSession>> {
        let ws_request = self.realtime_request(call, request)?;
        let client = RealtimeClient::connect(ws_request, call.cid()).await?;
        Ok(Box::new(client))
    }
}
