/// Announcer port trait
///
/// Defines the boundary to speech playback: the audio channel hands each
/// newly arrived intervention to an announcer so the facilitator can be
/// heard as well as read. Actual synthesis happens outside this crate.
use crate::domain::Intervention;
use async_trait::async_trait;

/// Port trait for announcing interventions out loud
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Announce a single intervention. Failures are the announcer's own
    /// concern and must not affect state.
    async fn announce(&self, intervention: &Intervention);
}
