/// Domain layer - canonical meeting state and the reconciliation core
///
/// Everything in here is pure and transport-agnostic: the models, the
/// heuristic extractor, the deduplicating merges and the reconciliation
/// function that ties them together.
pub mod dedup;
pub mod extract;
pub mod models;
pub mod reconcile;

pub use models::{
    Action, Decision, DecisionEntry, Energy, Intervention, InterventionDetails, InterventionKind,
    MeetingState, ParticipationStat, Sentiment, StatePatch, UpdatePayload,
};
pub use reconcile::reconcile;
