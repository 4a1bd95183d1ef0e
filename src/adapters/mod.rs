/// Adapters - transport-facing implementations
///
/// These modules bridge the external transports to the reconciliation
/// core. All merge semantics live in the domain layer; adapters only
/// parse, apply and report.
pub mod channels;

pub use channels::{backend_health, AudioSession, ChannelConfig, TextChannel};
