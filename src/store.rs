//! Canonical meeting-state store
//!
//! Owns the single live [`MeetingState`]. Updates flow through the pure
//! reconciliation function; the store only swaps in the result and fans the
//! new snapshot out to observers. No component mutates the state in place.

use crate::domain::{reconcile, MeetingState, UpdatePayload};
use crate::ports::StateObserver;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Thin holder around the canonical state.
///
/// A single lock serializes payload application, so one inbound message is
/// processed to completion (including observer notification) before the
/// next is considered - each channel's messages apply in delivery order,
/// and cross-channel interleaving is arrival order.
pub struct StateStore {
    state: Mutex<MeetingState>,
    observers: Mutex<Vec<Arc<dyn StateObserver>>>,
    last_update: Mutex<Option<DateTime<Utc>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MeetingState::default()),
            observers: Mutex::new(Vec::new()),
            last_update: Mutex::new(None),
        }
    }

    /// Register an observer for post-apply snapshots.
    pub async fn subscribe(&self, observer: Arc<dyn StateObserver>) {
        self.observers.lock().await.push(observer);
    }

    /// Apply one payload and return the resulting snapshot.
    ///
    /// Observers are notified while the state lock is held, which is what
    /// guarantees they see every applied update exactly once and in order.
    pub async fn apply(&self, payload: &UpdatePayload) -> MeetingState {
        let mut state = self.state.lock().await;
        let next = reconcile(&state, payload);
        *state = next.clone();
        *self.last_update.lock().await = Some(Utc::now());

        log::debug!(
            "Applied update: {} interventions, {} actions, {} decisions",
            next.interventions.len(),
            next.actions.len(),
            next.decisions.len()
        );

        let observers = self.observers.lock().await.clone();
        for observer in observers {
            observer.state_changed(&next).await;
        }

        next
    }

    /// Read-only copy of the current state.
    pub async fn snapshot(&self) -> MeetingState {
        self.state.lock().await.clone()
    }

    /// When the last update was applied, if any.
    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.lock().await
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::RecordingObserver;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> UpdatePayload {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_observers_see_each_applied_snapshot() {
        let store = StateStore::new();
        let observer = RecordingObserver::new();
        store.subscribe(Arc::new(observer.clone())).await;

        store
            .apply(&payload(json!({"interventions": [
                {"type": "note", "content": "kickoff"}
            ]})))
            .await;
        store
            .apply(&payload(json!({"state": {"sentiment": "positive"}})))
            .await;

        let snapshots = observer.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].interventions.len(), 1);
        assert_eq!(snapshots[1].sentiment.to_string(), "positive");
    }

    #[tokio::test]
    async fn test_sequential_applies_accumulate() {
        let store = StateStore::new();

        store
            .apply(&payload(json!({"interventions": [
                {"type": "action_item", "content": "Mary will review the contract by Monday."}
            ]})))
            .await;
        let snapshot = store
            .apply(&payload(json!({"interventions": [
                {"type": "decision", "content": "Decision: Use React for the frontend"}
            ]})))
            .await;

        assert_eq!(snapshot.interventions.len(), 2);
        assert_eq!(snapshot.actions.len(), 1);
        assert_eq!(snapshot.decisions.len(), 1);
    }

    #[test]
    fn test_last_update_starts_empty() {
        let store = StateStore::new();

        tokio_test::block_on(async {
            assert!(store.last_update().await.is_none());
            store.apply(&UpdatePayload::default()).await;
            assert!(store.last_update().await.is_some());
        });
    }
}
