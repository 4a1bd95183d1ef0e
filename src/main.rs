use async_trait::async_trait;
use meet_pulse::{
    backend_health, Announcer, AudioSession, ChannelConfig, Intervention, MeetingState,
    StateObserver, StateStore, TextChannel,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Renders each snapshot as log lines; stands in for the dashboard UI.
struct LoggingObserver;

#[async_trait]
impl StateObserver for LoggingObserver {
    async fn state_changed(&self, state: &MeetingState) {
        log::info!(
            "Dashboard: {} actions, {} decisions, {} parked, sentiment {}, energy {}",
            state.actions.len(),
            state.decisions.len(),
            state.parking_lot.len(),
            state.sentiment,
            state.energy
        );
        for action in &state.actions {
            log::info!(
                "  action: {} -> {} (due {})",
                action.speaker,
                action.task,
                action.deadline.as_deref().unwrap_or("unscheduled")
            );
        }
        for decision in &state.decisions {
            log::info!("  decision: {} (by {})", decision.what, decision.speaker);
        }
    }
}

/// Logs what speech playback would say; synthesis happens outside this crate.
struct LoggingAnnouncer;

#[async_trait]
impl Announcer for LoggingAnnouncer {
    async fn announce(&self, intervention: &Intervention) {
        log::info!("Announcing [{}]: {}", intervention.kind, intervention.content);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let base_url = std::env::var("MEET_PULSE_BACKEND_URL")
        .unwrap_or_else(|_| "ws://localhost:8000".to_string());
    let config = ChannelConfig::with_base_url(base_url);

    match backend_health(&config).await {
        Ok(message) => log::info!("Backend ready: {}", message),
        Err(e) => log::warn!("Backend health check failed ({}); continuing anyway", e),
    }

    let store = Arc::new(StateStore::new());
    store.subscribe(Arc::new(LoggingObserver)).await;

    let audio_session =
        match AudioSession::start(&config, Arc::clone(&store), Arc::new(LoggingAnnouncer)).await {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Audio channel unavailable ({}); text channel only", e);
                None
            }
        };

    let text_channel = TextChannel::new(config, Arc::clone(&store));

    log::info!("Type transcript lines; Ctrl-D to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = text_channel.submit(&line).await {
            log::error!("Transcript submission failed: {}", e);
        }
    }

    if let Some(mut session) = audio_session {
        let heard = session.transcript().await;
        if !heard.is_empty() {
            log::info!("Audio session transcript: {}", heard);
        }
        session.close().await?;
    }

    let final_state = store.snapshot().await;
    log::info!(
        "Final state: {} interventions, last update {:?}",
        final_state.interventions.len(),
        store.last_update().await
    );

    Ok(())
}
