pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod store;

pub use adapters::{backend_health, AudioSession, ChannelConfig, TextChannel};
pub use domain::{
    reconcile, Action, Decision, Energy, Intervention, InterventionKind, MeetingState, Sentiment,
    UpdatePayload,
};
pub use error::{AppError, Result};
pub use ports::{Announcer, StateObserver};
pub use store::StateStore;
