/// State observer port trait
///
/// Defines the boundary to the rendering layer: observers receive each new
/// canonical snapshot after the store applies an update. Observers are
/// read-only; nothing they do feeds back into reconciliation.
use crate::domain::MeetingState;
use async_trait::async_trait;

/// Port trait for dashboard-facing state observers
#[async_trait]
pub trait StateObserver: Send + Sync {
    /// Called with the full post-apply snapshot, once per applied payload.
    async fn state_changed(&self, state: &MeetingState);
}
