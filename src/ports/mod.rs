/// Port trait definitions (interfaces)
///
/// These traits define the contracts at the system boundary: the rendering
/// layer observes state, speech playback announces interventions.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod announce;
pub mod observer;

#[cfg(test)]
pub mod mocks;

pub use announce::Announcer;
pub use observer::StateObserver;
