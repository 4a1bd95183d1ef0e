//! Text-submission channel adapter
//!
//! Bridges typed transcript lines to the analysis backend: one WebSocket
//! round-trip per submission. The resulting analysis payload goes straight
//! to the state store; this adapter holds no merge logic of its own.

use crate::adapters::channels::ChannelConfig;
use crate::domain::{MeetingState, UpdatePayload};
use crate::error::{AppError, Result};
use crate::store::StateStore;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Outbound transcript submission
#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    transcript: &'a str,
}

/// Text channel bound to one backend and one store
pub struct TextChannel {
    config: ChannelConfig,
    store: Arc<StateStore>,
}

impl TextChannel {
    pub fn new(config: ChannelConfig, store: Arc<StateStore>) -> Self {
        Self { config, store }
    }

    /// Submit one transcript chunk for analysis and apply the response.
    ///
    /// Connects, sends the transcript, waits for the single analysis
    /// message, applies it and closes. A failed send or receive leaves
    /// state untouched; blank transcripts are rejected locally.
    pub async fn submit(&self, transcript: &str) -> Result<MeetingState> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(AppError::Channel("empty transcript".to_string()));
        }

        log::info!("Submitting transcript for analysis: {} chars", transcript.len());

        let (ws_stream, _) = connect_async(self.config.text_url())
            .await
            .map_err(|e| AppError::Channel(format!("WebSocket connection failed: {}", e)))?;
        let (mut write, mut read) = ws_stream.split();

        let request = serde_json::to_string(&TranscriptRequest { transcript })?;
        write
            .send(Message::Text(request))
            .await
            .map_err(|e| AppError::Channel(format!("Failed to send transcript: {}", e)))?;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let payload = match serde_json::from_str::<UpdatePayload>(&text) {
                        Ok(payload) => payload,
                        Err(e) => {
                            log::warn!("Skipping malformed analysis message: {}", e);
                            continue;
                        }
                    };

                    let snapshot = self.store.apply(&payload).await;
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(snapshot);
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(AppError::Channel(format!("WebSocket error: {}", e)));
                }
            }
        }

        Err(AppError::Channel(
            "connection closed before analysis arrived".to_string(),
        ))
    }
}
