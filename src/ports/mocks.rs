//! Mock implementations for testing

use crate::domain::{Intervention, MeetingState};
use crate::ports::announce::Announcer;
use crate::ports::observer::StateObserver;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recording observer that captures every snapshot it is handed
#[derive(Clone, Default)]
pub struct RecordingObserver {
    snapshots: Arc<Mutex<Vec<MeetingState>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<MeetingState> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateObserver for RecordingObserver {
    async fn state_changed(&self, state: &MeetingState) {
        self.snapshots.lock().unwrap().push(state.clone());
    }
}

/// Recording announcer that captures announced intervention content
#[derive(Clone, Default)]
pub struct RecordingAnnouncer {
    announced: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announced(&self) -> Vec<String> {
        self.announced.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, intervention: &Intervention) {
        self.announced
            .lock()
            .unwrap()
            .push(intervention.content.clone());
    }
}
