use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::event::{AssetReadyEvent, CallSessionEvent, ParticipantLeftEvent, WebhookEvent};
use super::WebhookError;
use crate::db::{timestamp_now, AgentRecord, AgentRepository, Database, MeetingRepository};
use crate::video::{AgentConnectRequest, CallRef, VideoProvider};

/// What a successfully handled delivery did. The HTTP response is the same
/// `{"status":"ok"}` for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    AgentJoined { meeting_id: String },
    CallEnded { meeting_id: String },
    MeetingProcessing { meeting_id: String },
    /// Session ended for a meeting that was not active.
    SessionEndIgnored { meeting_id: String },
    TranscriptStored { meeting_id: String },
    RecordingStored { meeting_id: String },
    Ignored { event_type: String },
}

/// Headers and raw body of one delivery.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    pub signature: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub body: &'a [u8],
}

pub struct WebhookService {
    db: Database,
    video: Arc<dyn VideoProvider>,
    openai_api_key: String,
    call_type: String,
}

impl WebhookService {
    pub fn new(
        db: Database,
        video: Arc<dyn VideoProvider>,
        openai_api_key: impl Into<String>,
        call_type: impl Into<String>,
    ) -> Self {
        Self {
            db,
            video,
            openai_api_key: openai_api_key.into(),
            call_type: call_type.into(),
        }
    }

    pub async fn handle(
        &self,
        request: WebhookRequest<'_>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let present = |value: Option<&str>| value.filter(|v| !v.is_empty()).is_some();
        if !present(request.signature) || !present(request.api_key) {
            return Err(WebhookError::MissingHeaders);
        }
        let signature = request.signature.unwrap_or_default();

        if !self.video.verify_webhook(request.body, signature) {
            warn!("Rejected webhook with invalid signature");
            return Err(WebhookError::InvalidSignature);
        }

        let event = WebhookEvent::parse(request.body)?;
        debug!("Received webhook event {}", event.event_type());

        match event {
            WebhookEvent::SessionStarted(event) => self.on_session_started(event).await,
            WebhookEvent::ParticipantLeft(event) => self.on_participant_left(event).await,
            WebhookEvent::SessionEnded(event) => self.on_session_ended(event).await,
            WebhookEvent::TranscriptionReady(event) => self.on_transcription_ready(event).await,
            WebhookEvent::RecordingReady(event) => self.on_recording_ready(event).await,
            WebhookEvent::Unhandled(event_type) => {
                debug!("Ignoring webhook event {:?}", event_type);
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }

    async fn on_session_started(
        &self,
        event: CallSessionEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let meeting_id = event
            .meeting_id()
            .ok_or(WebhookError::MissingMeetingId)?
            .to_string();

        let lookup_id = meeting_id.clone();
        let meeting = self
            .db
            .run(move |conn| MeetingRepository::find_activatable(conn, &lookup_id))
            .await?
            .ok_or(WebhookError::MeetingNotFound)?;

        let agent_id = meeting.agent_id.clone();
        let agent = self
            .db
            .run(move |conn| AgentRepository::get(conn, &agent_id))
            .await?
            .ok_or(WebhookError::AgentNotFound)?;

        let activate_id = meeting_id.clone();
        let activated = self
            .db
            .run(move |conn| MeetingRepository::activate(conn, &activate_id, &timestamp_now()))
            .await?;
        if !activated {
            warn!(
                "Meeting {} left the activatable state before it could be started",
                meeting_id
            );
            return Err(WebhookError::MeetingNotFound);
        }
        info!("Meeting {} is now active", meeting_id);

        // The meeting stays active if the agent cannot join
        let call = CallRef::new(&self.call_type, &meeting_id);
        if let Err(e) = self.attach_agent(&call, &agent).await {
            error!("AI setup failed for call {}: {:#}", call.cid(), e);
            return Err(WebhookError::AgentStartFailed(e));
        }

        info!("Agent {} joined call {}", agent.id, call.cid());
        Ok(WebhookOutcome::AgentJoined { meeting_id })
    }

    async fn attach_agent(&self, call: &CallRef, agent: &AgentRecord) -> anyhow::Result<()> {
        let request = AgentConnectRequest {
            openai_api_key: self.openai_api_key.clone(),
            agent_user_id: agent.id.clone(),
        };

        let session = self.video.connect_openai(call, &request).await?;
        session.update_session(&agent.instructions).await?;
        Ok(())
    }

    async fn on_participant_left(
        &self,
        event: ParticipantLeftEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let source = event.call().ok_or(WebhookError::MissingMeetingId)?;
        let call = CallRef::new(&self.call_type, source.id);

        if let Some(user_id) = event.user_id() {
            debug!("Participant {} left call {}", user_id, call.cid());
        }

        if let Err(e) = self.video.end_call(&call).await {
            error!("Failed to end call {}: {:#}", call.cid(), e);
            return Err(WebhookError::CallEndFailed(e));
        }

        Ok(WebhookOutcome::CallEnded { meeting_id: call.id })
    }

    async fn on_session_ended(
        &self,
        event: CallSessionEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let meeting_id = event
            .meeting_id()
            .ok_or(WebhookError::MissingMeetingId)?
            .to_string();

        let update_id = meeting_id.clone();
        let updated = self
            .db
            .run(move |conn| MeetingRepository::mark_processing(conn, &update_id, &timestamp_now()))
            .await?;

        if updated {
            info!("Meeting {} ended, now processing", meeting_id);
            Ok(WebhookOutcome::MeetingProcessing { meeting_id })
        } else {
            debug!("Session ended for meeting {} which was not active", meeting_id);
            Ok(WebhookOutcome::SessionEndIgnored { meeting_id })
        }
    }

    async fn on_transcription_ready(
        &self,
        event: AssetReadyEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let call = event.call().ok_or(WebhookError::MissingMeetingId)?;
        let url = event
            .transcription_url()
            .ok_or_else(|| {
                WebhookError::InvalidPayload("missing call_transcription.url".to_string())
            })?
            .to_string();

        let meeting_id = call.id;
        let update_id = meeting_id.clone();
        let stored = self
            .db
            .run(move |conn| MeetingRepository::set_transcript_url(conn, &update_id, &url))
            .await?;
        if !stored {
            return Err(WebhookError::MeetingNotFound);
        }

        info!("Stored transcript for meeting {}", meeting_id);
        Ok(WebhookOutcome::TranscriptStored { meeting_id })
    }

    async fn on_recording_ready(
        &self,
        event: AssetReadyEvent,
    ) -> Result<WebhookOutcome, WebhookError> {
        let call = event.call().ok_or(WebhookError::MissingMeetingId)?;
        let url = event
            .recording_url()
            .ok_or_else(|| {
                WebhookError::InvalidPayload("missing call_recording.url".to_string())
            })?
            .to_string();

        let meeting_id = call.id;
        let update_id = meeting_id.clone();
        let stored = self
            .db
            .run(move |conn| MeetingRepository::set_recording_url(conn, &update_id, &url))
            .await?;
        if !stored {
            return Err(WebhookError::MeetingNotFound);
        }

        info!("Stored recording for meeting {}", meeting_id);
        Ok(WebhookOutcome::RecordingStored { meeting_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::MeetingStatus;
    use crate::video::{signature, RealtimeSession};
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const SECRET: &str = "test-secret";

    #[derive(Default)]
    struct FakeVideo {
        fail_connect: bool,
        fail_end: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl FakeVideo {
        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    struct FakeSession {
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl RealtimeSession for FakeSession {
        async fn update_session(&self, instructions: &str) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("update:{}", instructions));
            Ok(())
        }
    }

    #[async_trait]
    impl VideoProvider for FakeVideo {
        fn verify_webhook(&self, body: &[u8], sig: &str) -> bool {
            signature::verify(SECRET, body, sig)
        }

        async fn end_call(&self, call: &CallRef) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("end:{}", call.cid()));
            if self.fail_end {
                bail!("provider unavailable");
            }
            Ok(())
        }

        async fn connect_openai(
            &self,
            call: &CallRef,
            request: &AgentConnectRequest,
        ) -> anyhow::Result<Box<dyn RealtimeSession>> {
            self.log.lock().unwrap().push(format!(
                "connect:{}:{}:{}",
                call.cid(),
                request.agent_user_id,
                request.openai_api_key
            ));
            if self.fail_connect {
                bail!("realtime handshake failed");
            }
            Ok(Box::new(FakeSession {
                log: self.log.clone(),
            }))
        }
    }

    struct Fixture {
        db: Database,
        video: Arc<FakeVideo>,
        service: WebhookService,
        agent_id: String,
        meeting_id: String,
    }

    fn fixture_with(video: FakeVideo) -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let (agent_id, meeting_id) = db
            .with_conn(|conn| {
                let agent_id = AgentRepository::insert(conn, "Tutor", "user-1", "Teach Rust")?;
                let meeting_id = MeetingRepository::insert(conn, "Lesson", "user-1", &agent_id)?;
                Ok((agent_id, meeting_id))
            })
            .unwrap();
        let video = Arc::new(video);
        let service = WebhookService::new(db.clone(), video.clone(), "sk-test", "default");
        Fixture {
            db,
            video,
            service,
            agent_id,
            meeting_id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(FakeVideo::default())
    }

    impl Fixture {
        async fn deliver(&self, body: &str) -> Result<WebhookOutcome, WebhookError> {
            let sig = signature::sign(SECRET, body.as_bytes());
            self.service
                .handle(WebhookRequest {
                    signature: Some(&sig),
                    api_key: Some("key"),
                    body: body.as_bytes(),
                })
                .await
        }

        fn meeting(&self) -> crate::db::MeetingRecord {
            let id = self.meeting_id.clone();
            self.db
                .with_conn(|conn| MeetingRepository::get(conn, &id))
                .unwrap()
                .unwrap()
        }

        fn set_status(&self, status: MeetingStatus) {
            let id = self.meeting_id.clone();
            self.db
                .with_conn(|conn| MeetingRepository::update_status(conn, &id, status))
                .unwrap();
        }
    }

    fn session_started(meeting_id: &str) -> String {
        format!(
            r#"{{"type":"call.session_started","call_cid":"default:{0}","call":{{"id":"{0}","custom":{{"meetingId":"{0}"}}}}}}"#,
            meeting_id
        )
    }

    #[tokio::test]
    async fn test_missing_headers() {
        let f = fixture();
        let cases = [
            (None, Some("key")),
            (Some("sig"), None),
            (Some(""), Some("key")),
        ];
        for (signature, api_key) in cases {
            let result = f
                .service
                .handle(WebhookRequest {
                    signature,
                    api_key,
                    body: b"{}",
                })
                .await;
            assert!(matches!(result, Err(WebhookError::MissingHeaders)));
        }
        assert!(f.video.log().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_body_rejected_without_mutation() {
        let f = fixture();
        let sig = signature::sign(SECRET, session_started(&f.meeting_id).as_bytes());
        let tampered = session_started(&format!("{}x", f.meeting_id));

        let result = f
            .service
            .handle(WebhookRequest {
                signature: Some(&sig),
                api_key: Some("key"),
                body: tampered.as_bytes(),
            })
            .await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        assert_eq!(f.meeting().status, MeetingStatus::Upcoming);
        assert!(f.video.log().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let f = fixture();
        assert!(matches!(f.deliver("{oops").await, Err(WebhookError::InvalidJson)));
    }

    #[tokio::test]
    async fn test_session_started_activates_and_attaches_agent() {
        let f = fixture();
        let outcome = f.deliver(&session_started(&f.meeting_id)).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::AgentJoined {
                meeting_id: f.meeting_id.clone()
            }
        );
        let meeting = f.meeting();
        assert_eq!(meeting.status, MeetingStatus::Active);
        assert!(meeting.started_at.is_some());
        assert_eq!(
            f.video.log(),
            vec![
                format!("connect:default:{}:{}:sk-test", f.meeting_id, f.agent_id),
                "update:Teach Rust".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_session_started_missing_meeting_id() {
        let f = fixture();
        let body = r#"{"type":"call.session_started","call":{"id":"x","custom":{}}}"#;
        assert!(matches!(f.deliver(body).await, Err(WebhookError::MissingMeetingId)));
    }

    #[tokio::test]
    async fn test_session_started_for_completed_meeting() {
        let f = fixture();
        f.set_status(MeetingStatus::Completed);

        let result = f.deliver(&session_started(&f.meeting_id)).await;
        assert!(matches!(result, Err(WebhookError::MeetingNotFound)));

        let meeting = f.meeting();
        assert_eq!(meeting.status, MeetingStatus::Completed);
        assert!(meeting.started_at.is_none());
        assert!(f.video.log().is_empty());
    }

    #[tokio::test]
    async fn test_session_started_unknown_meeting() {
        let f = fixture();
        let result = f.deliver(&session_started("does-not-exist")).await;
        assert!(matches!(result, Err(WebhookError::MeetingNotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_session_started_attaches_once() {
        let f = fixture();
        f.deliver(&session_started(&f.meeting_id)).await.unwrap();

        let result = f.deliver(&session_started(&f.meeting_id)).await;
        assert!(matches!(result, Err(WebhookError::MeetingNotFound)));

        let connects = f
            .video
            .log()
            .iter()
            .filter(|entry| entry.starts_with("connect:"))
            .count();
        assert_eq!(connects, 1);
    }

    #[tokio::test]
    async fn test_session_started_missing_agent_leaves_meeting_untouched() {
        let f = fixture();
        let id = f.meeting_id.clone();
        f.db.with_conn(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
            conn.execute("UPDATE meetings SET agent_id = 'gone' WHERE id = ?1", [&id])?;
            Ok(())
        })
        .unwrap();

        let result = f.deliver(&session_started(&f.meeting_id)).await;
        assert!(matches!(result, Err(WebhookError::AgentNotFound)));
        assert_eq!(f.meeting().status, MeetingStatus::Upcoming);
    }

    #[tokio::test]
    async fn test_agent_failure_keeps_meeting_active() {
        let f = fixture_with(FakeVideo {
            fail_connect: true,
            ..FakeVideo::default()
        });

        let result = f.deliver(&session_started(&f.meeting_id)).await;
        assert!(matches!(result, Err(WebhookError::AgentStartFailed(_))));
        assert_eq!(f.meeting().status, MeetingStatus::Active);
    }

    #[tokio::test]
    async fn test_participant_left_ends_call() {
        let f = fixture();
        let body = r#"{"type":"call.session_participant_left","call_cid":"default:abc123"}"#;

        let outcome = f.deliver(body).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::CallEnded {
                meeting_id: "abc123".to_string()
            }
        );
        assert_eq!(f.video.log(), vec!["end:default:abc123".to_string()]);
        assert_eq!(f.meeting().status, MeetingStatus::Upcoming);
    }

    #[tokio::test]
    async fn test_participant_left_without_id() {
        let f = fixture();
        let body = r#"{"type":"call.session_participant_left","call_cid":"abc123"}"#;
        assert!(matches!(f.deliver(body).await, Err(WebhookError::MissingMeetingId)));
        assert!(f.video.log().is_empty());
    }

    #[tokio::test]
    async fn test_participant_left_provider_failure() {
        let f = fixture_with(FakeVideo {
            fail_end: true,
            ..FakeVideo::default()
        });
        let body = r#"{"type":"call.session_participant_left","call_cid":"default:abc123"}"#;
        assert!(matches!(f.deliver(body).await, Err(WebhookError::CallEndFailed(_))));
    }

    #[tokio::test]
    async fn test_session_ended_moves_to_processing() {
        let f = fixture();
        let ended = format!(
            r#"{{"type":"call.session_ended","call":{{"custom":{{"meetingId":"{}"}}}}}}"#,
            f.meeting_id
        );

        let outcome = f.deliver(&ended).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::SessionEndIgnored { .. }));

        f.deliver(&session_started(&f.meeting_id)).await.unwrap();
        let outcome = f.deliver(&ended).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::MeetingProcessing { .. }));

        let meeting = f.meeting();
        assert_eq!(meeting.status, MeetingStatus::Processing);
        assert!(meeting.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_asset_ready_events() {
        let f = fixture();
        let transcript = format!(
            r#"{{"type":"call.transcription_ready","call_cid":"default:{}","call_transcription":{{"url":"https://cdn/t.jsonl"}}}}"#,
            f.meeting_id
        );
        let recording = format!(
            r#"{{"type":"call.recording_ready","call_cid":"default:{}","call_recording":{{"url":"https://cdn/r.mp4"}}}}"#,
            f.meeting_id
        );

        f.deliver(&transcript).await.unwrap();
        f.deliver(&recording).await.unwrap();

        let meeting = f.meeting();
        assert_eq!(meeting.transcript_url.as_deref(), Some("https://cdn/t.jsonl"));
        assert_eq!(meeting.recording_url.as_deref(), Some("https://cdn/r.mp4"));
    }

    #[tokio::test]
    async fn test_asset_ready_for_unknown_meeting() {
        let f = fixture();
        let body = r#"{"type":"call.recording_ready","call_cid":"default:nope","call_recording":{"url":"https://cdn/r.mp4"}}"#;
        assert!(matches!(f.deliver(body).await, Err(WebhookError::MeetingNotFound)));
    }

    #[tokio::test]
    async fn test_unhandled_event_is_noop() {
        let f = fixture();
        let outcome = f
            .deliver(r#"{"type":"call.member_added","call_cid":"default:abc"}"#)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event_type: "call.member_added".to_string()
            }
        );
        assert!(f.video.log().is_empty());
        assert_eq!(f.meeting().status, MeetingStatus::Upcoming);
    }
}
