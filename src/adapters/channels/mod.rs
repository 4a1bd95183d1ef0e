//! Analysis channel adapters
//!
//! Two independent transports deliver analysis payloads:
//! - text: one-shot submission of typed transcript lines
//! - audio: persistent streaming session fed with raw audio chunks
//!
//! Adapters carry no merge logic; they parse inbound messages and hand
//! them to the state store.

pub mod audio;
pub mod text;

pub use audio::AudioSession;
pub use text::TextChannel;

use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Backend endpoints for both channels.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket base URL of the analysis backend
    pub base_url: String,

    /// Path of the text-submission endpoint
    pub text_path: String,

    /// Path of the streaming audio endpoint
    pub audio_path: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_url: "ws://localhost:8000".to_string(),
            text_path: "/ws".to_string(),
            audio_path: "/ws/audio".to_string(),
        }
    }
}

impl ChannelConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn text_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.text_path)
    }

    pub fn audio_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.audio_path)
    }

    /// HTTP URL of the backend root, derived from the WebSocket base URL.
    pub fn health_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let http = if let Some(rest) = base.strip_prefix("wss://") {
            format!("https://{}", rest)
        } else if let Some(rest) = base.strip_prefix("ws://") {
            format!("http://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/", http)
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: String,
}

/// Probe the backend root endpoint and return its greeting.
///
/// Used at startup to report connectivity before any channel opens; a
/// failure here is informational and must not block the channels.
pub async fn backend_health(config: &ChannelConfig) -> Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client");

    let response = client.get(config.health_url()).send().await?;

    if !response.status().is_success() {
        return Err(AppError::Channel(format!(
            "Backend health check failed: HTTP {}",
            response.status()
        )));
    }

    let health: HealthResponse = response.json().await?;
    Ok(health.message)
}
