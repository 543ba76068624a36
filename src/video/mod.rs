//! Video provider integration.
//!
//! The webhook handler talks to the provider only through [`VideoProvider`]:
//! - webhook signature verification
//! - ending a call
//! - bridging a call to an OpenAI realtime voice agent

pub mod realtime;
pub mod signature;
pub mod stream;
pub mod token;

pub use realtime::{RealtimeClient, RealtimeSession};
pub use stream::StreamClient;

use anyhow::Result;
use async_trait::async_trait;

/// A call addressed by type and id, rendered as a `"<type>:<id>"` cid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRef {
    pub call_type: String,
    pub id: String,
}

impl CallRef {
    pub fn new(call_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            call_type: call_type.into(),
            id: id.into(),
        }
    }

    /// Split a `"<type>:<id>"` cid. Returns None when there is no id segment.
    pub fn parse_cid(cid: &str) -> Option<Self> {
        let mut parts = cid.split(':');
        let call_type = parts.next()?;
        let id = parts.next().filter(|id| !id.is_empty())?;
        Some(Self::new(call_type, id))
    }

    pub fn cid(&self) -> String {
        format!("{}:{}", self.call_type, self.id)
    }
}

/// Parameters for attaching an OpenAI realtime agent to a call.
#[derive(Debug, Clone)]
pub struct AgentConnectRequest {
    pub openai_api_key: String,
    pub agent_user_id: String,
}

#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Check a webhook body against the provider's signature header.
    fn verify_webhook(&self, body: &[u8], signature: &str) -> bool;

    async fn end_call(&self, call: &CallRef) -> Result<()>;

    async fn connect_openai(
        &self,
        call: &CallRef,
        request: &AgentConnectRequest,
    ) -> Result<Box<dyn RealtimeSession>>;
}
