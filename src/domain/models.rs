/// Domain models for Meet Pulse
///
/// The canonical meeting snapshot and the wire payloads that update it.
/// These models are transport-agnostic.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Wire default for confidence values the analyzer did not supply.
pub(crate) fn default_confidence() -> f32 {
    0.9
}

fn default_decision_speaker() -> String {
    "Team".to_string()
}

/// Overall meeting sentiment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Neutral
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Meeting energy level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    High,
    Medium,
    Low,
}

impl Default for Energy {
    fn default() -> Self {
        Energy::Medium
    }
}

impl std::fmt::Display for Energy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Energy::High => write!(f, "high"),
            Energy::Medium => write!(f, "medium"),
            Energy::Low => write!(f, "low"),
        }
    }
}

/// Type of intervention produced by the analyzer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    ActionItem,
    Decision,
    Note,
    /// Any type string this client does not recognize
    #[serde(other)]
    Other,
}

impl std::fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterventionKind::ActionItem => write!(f, "action_item"),
            InterventionKind::Decision => write!(f, "decision"),
            InterventionKind::Note => write!(f, "note"),
            InterventionKind::Other => write!(f, "other"),
        }
    }
}

/// An analyzer-produced note tagged with a type, carrying free text and
/// optional structured detail. Appended to the state exactly once, never
/// mutated or removed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub content: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<InterventionDetails>,
}

/// Structured fields the analyzer may attach to an intervention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterventionDetails {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    /// Analyzer-specific extras (e.g. priority) are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A concrete commitment: who does what by when.
///
/// May originate directly in the canonical `actions` list (authoritative)
/// or be derived from an `action_item` intervention (secondary).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    pub speaker: String,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

/// A decision the meeting arrived at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub what: String,
    #[serde(default = "default_decision_speaker")]
    pub speaker: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

/// Wire shape for canonical decisions: the backend sends either a structured
/// record or plain text. Resolved into `Decision` at ingestion and never
/// propagated further into the system.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecisionEntry {
    Structured(Decision),
    Text(String),
}

impl DecisionEntry {
    /// Resolve into the single canonical shape.
    pub fn into_decision(self) -> Decision {
        match self {
            DecisionEntry::Structured(decision) => decision,
            DecisionEntry::Text(what) => Decision {
                what,
                speaker: default_decision_speaker(),
                confidence: default_confidence(),
            },
        }
    }
}

/// Per-speaker participation counters, accumulated by map-merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParticipationStat {
    #[serde(default)]
    pub turns: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The single canonical snapshot rendered by the dashboard.
///
/// Every field is always present and well-typed; a field absent from an
/// incoming payload keeps its existing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingState {
    pub interventions: Vec<Intervention>,
    pub actions: Vec<Action>,
    pub decisions: Vec<Decision>,
    pub parking_lot: Vec<Value>,
    pub participation: HashMap<String, ParticipationStat>,
    pub sentiment: Sentiment,
    pub energy: Energy,
}

/// One inbound analysis message from either channel. Consumed once by
/// reconciliation, never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayload {
    #[serde(default, deserialize_with = "lenient")]
    pub transcript: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub interventions: Option<Vec<Intervention>>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<StatePatch>,
}

/// A partial, MeetingState-shaped update.
///
/// Every field is optional; fields the backend omitted (or sent malformed)
/// stay `None` and fall back to the prior value during reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatePatch {
    #[serde(default, deserialize_with = "lenient")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, deserialize_with = "lenient")]
    pub decisions: Option<Vec<DecisionEntry>>,
    #[serde(default, deserialize_with = "lenient")]
    pub parking_lot: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub participation: Option<HashMap<String, ParticipationStat>>,
    #[serde(default, deserialize_with = "lenient")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, deserialize_with = "lenient")]
    pub energy: Option<Energy>,
}

/// Accept a field when it parses, drop it to `None` when it does not.
///
/// Reconciliation must stay total over arbitrary JSON-shaped input, so a
/// malformed field is treated exactly like an absent one.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_intervention_type_maps_to_other() {
        let intervention: Intervention = serde_json::from_value(json!({
            "type": "tangent_alert",
            "content": "We are drifting off-topic"
        }))
        .unwrap();

        assert_eq!(intervention.kind, InterventionKind::Other);
        assert_eq!(intervention.confidence, 0.9);
        assert!(intervention.speaker.is_none());
    }

    #[test]
    fn test_decision_entry_resolves_plain_text() {
        let entry: DecisionEntry = serde_json::from_value(json!("Ship on Friday")).unwrap();
        let decision = entry.into_decision();

        assert_eq!(decision.what, "Ship on Friday");
        assert_eq!(decision.speaker, "Team");
        assert_eq!(decision.confidence, 0.9);
    }

    #[test]
    fn test_decision_entry_keeps_structured_fields() {
        let entry: DecisionEntry = serde_json::from_value(json!({
            "what": "Use the staging cluster",
            "speaker": "Priya",
            "confidence": 0.7
        }))
        .unwrap();
        let decision = entry.into_decision();

        assert_eq!(decision.speaker, "Priya");
        assert_eq!(decision.confidence, 0.7);
    }

    #[test]
    fn test_malformed_patch_field_drops_to_none() {
        // actions is not a list and sentiment is not a known value; both
        // must degrade to "absent" instead of failing the whole payload
        let payload: UpdatePayload = serde_json::from_value(json!({
            "state": {
                "actions": "not-a-list",
                "sentiment": "confused",
                "energy": "high"
            }
        }))
        .unwrap();

        let patch = payload.state.unwrap();
        assert!(patch.actions.is_none());
        assert!(patch.sentiment.is_none());
        assert_eq!(patch.energy, Some(Energy::High));
    }

    #[test]
    fn test_participation_stat_preserves_extra_fields() {
        let stat: ParticipationStat = serde_json::from_value(json!({
            "turns": 4,
            "words": 120
        }))
        .unwrap();

        assert_eq!(stat.turns, 4);
        assert_eq!(stat.extra.get("words"), Some(&json!(120)));
    }
}
