/// Merging canonical lists with intervention-derived records
///
/// Actions and decisions reach the dashboard from two sources of varying
/// reliability: the backend's canonical `state` lists (authoritative) and
/// individual interventions (secondary). These merges keep both without
/// showing the same item twice.
use crate::domain::extract::{decision_text, extract_action};
use crate::domain::models::{Action, Decision, Intervention, InterventionKind};

/// Derived tasks must be longer than this many characters; anything shorter
/// is noise, not a commitment.
const MIN_TASK_CHARS: usize = 3;

fn action_key(speaker: &str, task: &str) -> String {
    format!("{}:{}", speaker.to_lowercase(), task.to_lowercase())
}

/// Bidirectional substring containment between two dedup keys.
///
/// This is the fuzzy half of action dedup: a structured action and a
/// free-text restatement of the same commitment rarely produce equal keys,
/// but one key usually contains the other. Known limitations: the scan over
/// the seen-list is O(n*m), there is no semantic understanding, and
/// composite `speaker:task` keys can both under- and over-merge on
/// pathological inputs (see tests).
fn keys_overlap(existing: &str, candidate: &str) -> bool {
    existing.contains(candidate) || candidate.contains(existing)
}

/// Derive an [`Action`] from an `action_item` intervention.
///
/// Structured `details` win when they carry a task; otherwise the free-text
/// content goes through the heuristic extractor. Either way the
/// intervention's own confidence is kept.
fn derive_action(intervention: &Intervention) -> Action {
    if let Some(task) = intervention.details.as_ref().and_then(|d| d.task.clone()) {
        return Action {
            speaker: intervention
                .speaker
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            task,
            deadline: intervention
                .details
                .as_ref()
                .and_then(|d| d.deadline.clone()),
            confidence: intervention.confidence,
        };
    }

    let mut action = extract_action(&intervention.content, intervention.speaker.as_deref());
    action.confidence = intervention.confidence;
    action
}

/// Produce one ordered, duplicate-free action list from the canonical list
/// and any `action_item` interventions.
///
/// Canonical entries always win ties and come first, in order; admitted
/// derived entries follow in intervention arrival order. The output never
/// exceeds `canonical.len() + interventions.len()` entries, and the merge
/// is idempotent.
pub fn merge_actions(canonical: &[Action], interventions: &[Intervention]) -> Vec<Action> {
    let mut merged: Vec<Action> = canonical.to_vec();
    let mut seen: Vec<String> = canonical
        .iter()
        .map(|action| action_key(&action.speaker, &action.task))
        .collect();

    for intervention in interventions {
        if intervention.kind != InterventionKind::ActionItem {
            continue;
        }

        let action = derive_action(intervention);
        if action.task.chars().count() <= MIN_TASK_CHARS {
            continue;
        }

        let key = action_key(&action.speaker, &action.task);
        if seen.iter().any(|existing| keys_overlap(existing, &key)) {
            continue;
        }

        seen.push(key);
        merged.push(action);
    }

    merged
}

/// Produce one ordered, duplicate-free decision list from the canonical
/// list and any `decision` interventions.
///
/// Decisions dedup on exact normalized text (lowercased, trimmed `what`) -
/// no substring absorption. Empty decision text never produces an entry.
pub fn merge_decisions(canonical: &[Decision], interventions: &[Intervention]) -> Vec<Decision> {
    let mut merged: Vec<Decision> = canonical.to_vec();
    let mut seen: Vec<String> = canonical
        .iter()
        .map(|decision| decision.what.trim().to_lowercase())
        .collect();

    for intervention in interventions {
        if intervention.kind != InterventionKind::Decision {
            continue;
        }

        let what = decision_text(&intervention.content);
        if what.is_empty() {
            continue;
        }

        let key = what.to_lowercase();
        if seen.contains(&key) {
            continue;
        }

        seen.push(key);
        merged.push(Decision {
            what,
            speaker: intervention
                .speaker
                .clone()
                .unwrap_or_else(|| "Team".to_string()),
            confidence: intervention.confidence,
        });
    }

    merged
}
