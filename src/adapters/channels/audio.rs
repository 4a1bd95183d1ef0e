//! Streaming audio channel adapter
//!
//! Maintains the persistent WebSocket session to the backend's audio
//! endpoint: raw audio chunks go up base64-framed, transcription analyses
//! come down and are applied to the store. Newly arrived interventions are
//! handed to the announcer so the facilitator is heard as well as read.

use crate::adapters::channels::ChannelConfig;
use crate::domain::{Intervention, UpdatePayload};
use crate::error::{AppError, Result};
use crate::ports::Announcer;
use crate::store::StateStore;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Outbound audio frame envelope
#[derive(Debug, Serialize)]
struct AudioFrame<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    audio: String,
}

/// Inbound message envelope on the audio channel
#[derive(Debug, Deserialize)]
struct AudioServerMessage {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    update: UpdatePayload,
}

type WsSink = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Live audio streaming session
pub struct AudioSession {
    /// WebSocket write sink
    ws_sender: Arc<Mutex<Option<WsSink>>>,

    /// Session active status
    is_active: Arc<Mutex<bool>>,

    /// Running transcript accumulated from transcription messages
    transcript: Arc<Mutex<String>>,

    /// Handle to the receiver task
    receiver_task: Option<tokio::task::JoinHandle<()>>,
}

impl AudioSession {
    /// Open the audio channel and spawn the receiver task.
    pub async fn start(
        config: &ChannelConfig,
        store: Arc<StateStore>,
        announcer: Arc<dyn Announcer>,
    ) -> Result<Self> {
        let url = config.audio_url();
        log::info!("Connecting to audio channel: {}", url);

        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| AppError::Channel(format!("Audio WebSocket connection failed: {}", e)))?;

        log::info!("Audio channel connected");

        let (write, mut read) = ws_stream.split();
        let ws_sender = Arc::new(Mutex::new(Some(write)));
        let is_active = Arc::new(Mutex::new(true));
        let transcript = Arc::new(Mutex::new(String::new()));

        let is_active_task = Arc::clone(&is_active);
        let transcript_task = Arc::clone(&transcript);
        let receiver_task = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        handle_frame(&text, &store, announcer.as_ref(), &transcript_task).await;
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("Audio channel closed by backend");
                        *is_active_task.lock().await = false;
                        break;
                    }
                    Err(e) => {
                        log::error!("Audio channel error: {}", e);
                        *is_active_task.lock().await = false;
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            ws_sender,
            is_active,
            transcript,
            receiver_task: Some(receiver_task),
        })
    }

    /// Send one raw audio chunk upstream.
    pub async fn send_audio(&self, chunk: &[u8]) -> Result<()> {
        let mut sender = self.ws_sender.lock().await;

        if let Some(ws) = sender.as_mut() {
            let frame = AudioFrame {
                kind: "audio",
                audio: BASE64.encode(chunk),
            };
            ws.send(Message::Text(serde_json::to_string(&frame)?))
                .await
                .map_err(|e| AppError::Channel(format!("Failed to send audio chunk: {}", e)))?;
            Ok(())
        } else {
            Err(AppError::Channel("audio channel is closed".to_string()))
        }
    }

    /// Running transcript accumulated so far on this session.
    pub async fn transcript(&self) -> String {
        self.transcript.lock().await.clone()
    }

    pub fn is_active(&self) -> bool {
        // try_lock because this is a sync accessor; a contended lock just
        // reports inactive for this poll
        self.is_active.try_lock().map(|guard| *guard).unwrap_or(false)
    }

    /// Close the session and wait for the receiver task to finish.
    pub async fn close(&mut self) -> Result<()> {
        log::info!("Closing audio channel");

        *self.is_active.lock().await = false;

        let mut sender = self.ws_sender.lock().await;
        if let Some(mut ws) = sender.take() {
            let _ = ws.send(Message::Close(None)).await;
            let _ = ws.close().await;
        }
        drop(sender);

        if let Some(task) = self.receiver_task.take() {
            let _ = task.await;
        }

        Ok(())
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        // Attempt to close gracefully
        if let Some(task) = self.receiver_task.take() {
            task.abort();
        }
    }
}

/// Apply one inbound audio-channel frame.
///
/// Only "transcription" frames carry analysis; other frame types are
/// ignored. A malformed frame is logged and skipped, never applied
/// partially.
async fn handle_frame(
    text: &str,
    store: &StateStore,
    announcer: &dyn Announcer,
    transcript: &Mutex<String>,
) {
    let message: AudioServerMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            log::warn!("Skipping malformed audio-channel frame: {}", e);
            return;
        }
    };

    if message.kind.as_deref() != Some("transcription") {
        log::debug!("Ignoring audio-channel frame of type {:?}", message.kind);
        return;
    }

    if let Some(new_text) = &message.update.transcript {
        let mut running = transcript.lock().await;
        if !running.is_empty() {
            running.push(' ');
        }
        running.push_str(new_text);
    }

    let announced: Vec<Intervention> = message.update.interventions.clone().unwrap_or_default();
    store.apply(&message.update).await;

    for intervention in &announced {
        announcer.announce(intervention).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::announce::MockAnnouncer;
    use crate::ports::mocks::RecordingAnnouncer;
    use serde_json::json;

    #[tokio::test]
    async fn test_transcription_frame_applies_and_announces() {
        let store = StateStore::new();
        let mut announcer = MockAnnouncer::new();
        announcer
            .expect_announce()
            .withf(|intervention: &Intervention| intervention.content.contains("contract"))
            .times(1)
            .returning(|_| ());
        let transcript = Mutex::new(String::new());

        let frame = json!({
            "type": "transcription",
            "transcript": "Mary will review the contract by Monday.",
            "interventions": [{
                "type": "action_item",
                "content": "Mary will review the contract by Monday.",
                "confidence": 0.8
            }]
        })
        .to_string();

        handle_frame(&frame, &store, &announcer, &transcript).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.interventions.len(), 1);
        assert_eq!(snapshot.actions.len(), 1);
        assert_eq!(
            transcript.lock().await.as_str(),
            "Mary will review the contract by Monday."
        );
    }

    #[tokio::test]
    async fn test_non_transcription_frames_are_ignored() {
        let store = StateStore::new();
        let announcer = RecordingAnnouncer::new();
        let transcript = Mutex::new(String::new());

        let frame = json!({
            "type": "audio_ack",
            "interventions": [{"type": "note", "content": "should not land"}]
        })
        .to_string();

        handle_frame(&frame, &store, &announcer, &transcript).await;

        assert!(store.snapshot().await.interventions.is_empty());
        assert!(announcer.announced().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_frames_are_skipped() {
        let store = StateStore::new();
        let announcer = RecordingAnnouncer::new();
        let transcript = Mutex::new(String::new());

        handle_frame("not json at all", &store, &announcer, &transcript).await;

        assert!(store.snapshot().await.interventions.is_empty());
    }

    #[tokio::test]
    async fn test_transcript_accumulates_across_frames() {
        let store = StateStore::new();
        let announcer = RecordingAnnouncer::new();
        let transcript = Mutex::new(String::new());

        for text in ["first chunk", "second chunk"] {
            let frame = json!({"type": "transcription", "transcript": text}).to_string();
            handle_frame(&frame, &store, &announcer, &transcript).await;
        }

        assert_eq!(transcript.lock().await.as_str(), "first chunk second chunk");
    }

    #[tokio::test]
    async fn test_session_round_trip_against_loopback_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            // first frame must be a base64 audio envelope
            let inbound = ws.next().await.unwrap().unwrap();
            let frame: serde_json::Value =
                serde_json::from_str(inbound.to_text().unwrap()).unwrap();
            assert_eq!(frame["type"], "audio");
            assert_eq!(
                BASE64.decode(frame["audio"].as_str().unwrap()).unwrap(),
                b"chunk-bytes"
            );

            let analysis = json!({
                "type": "transcription",
                "transcript": "Decision: Use React for the frontend",
                "interventions": [{
                    "type": "decision",
                    "content": "Decision: Use React for the frontend"
                }]
            });
            ws.send(Message::Text(analysis.to_string())).await.unwrap();
            let _ = ws.send(Message::Close(None)).await;
        });

        let store = Arc::new(StateStore::new());
        let announcer = RecordingAnnouncer::new();
        let config = ChannelConfig::with_base_url(format!("ws://{}", addr));

        let mut session = AudioSession::start(
            &config,
            Arc::clone(&store),
            Arc::new(announcer.clone()),
        )
        .await
        .unwrap();

        session.send_audio(b"chunk-bytes").await.unwrap();
        server.await.unwrap();

        // the receiver task drains the close frame and stops
        session.close().await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.decisions.len(), 1);
        assert_eq!(snapshot.decisions[0].what, "Use React for the frontend");
        assert_eq!(announcer.announced().len(), 1);
        assert!(!session.is_active());
    }
}
