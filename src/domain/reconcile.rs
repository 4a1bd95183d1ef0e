/// Meeting-state reconciliation
///
/// The sole place the next canonical state is computed. Pure and total:
/// any JSON-shaped payload produces a next state, never an error.
use crate::domain::dedup::{merge_actions, merge_decisions};
use crate::domain::models::{Decision, DecisionEntry, MeetingState, StatePatch, UpdatePayload};

/// Compute the next [`MeetingState`] from the prior state and one incoming
/// update payload.
///
/// Per-field policy:
/// - `interventions`: append, preserving arrival order; never truncated
/// - `actions` / `decisions`: the payload's canonical list (when present)
///   replaces the seed, otherwise the prior list seeds; either way the
///   deduplicators re-run against the accumulated interventions
/// - `parking_lot`: replace wholesale when present
/// - `participation`: shallow-merge, payload entries win per key
/// - `sentiment` / `energy`: replace when present
///
/// Malformed fields have already been dropped to `None` by lenient payload
/// parsing and therefore fall to "keep prior" here.
pub fn reconcile(prior: &MeetingState, payload: &UpdatePayload) -> MeetingState {
    let mut next = prior.clone();

    if let Some(interventions) = &payload.interventions {
        next.interventions.extend(interventions.iter().cloned());
    }

    let StatePatch {
        actions,
        decisions,
        parking_lot,
        participation,
        sentiment,
        energy,
    } = payload.state.clone().unwrap_or_default();

    let canonical_actions = actions.unwrap_or_else(|| prior.actions.clone());
    next.actions = merge_actions(&canonical_actions, &next.interventions);

    let canonical_decisions = match decisions {
        Some(entries) => normalize_decisions(entries),
        None => prior.decisions.clone(),
    };
    next.decisions = merge_decisions(&canonical_decisions, &next.interventions);

    if let Some(parking_lot) = parking_lot {
        next.parking_lot = parking_lot;
    }
    if let Some(participation) = participation {
        next.participation.extend(participation);
    }
    if let Some(sentiment) = sentiment {
        next.sentiment = sentiment;
    }
    if let Some(energy) = energy {
        next.energy = energy;
    }

    next
}

/// Resolve wire decision entries (structured or plain text) into the single
/// canonical shape, once, at ingestion.
fn normalize_decisions(entries: Vec<DecisionEntry>) -> Vec<Decision> {
    entries.into_iter().map(DecisionEntry::into_decision).collect()
}
