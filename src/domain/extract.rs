/// Heuristic extraction of structured records from free-text interventions
///
/// Free-text interventions are a lossy channel; regex recovery is a
/// pragmatic bridge until the upstream analyzer reliably emits structured
/// `details`. Best effort only - this is not a general NL parser, and the
/// pattern coverage is deliberately not expanded beyond what the analyzer
/// is prompted to produce.
use crate::domain::models::{default_confidence, Action};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches "<name> will <task> by <deadline>", case-insensitive.
static ACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\w+)\s+will\s+(.+?)\s+by\s+(.+)")
        .expect("hard-coded action pattern compiles")
});

/// Recover an [`Action`] from an intervention's free-text content.
///
/// Never fails: on a pattern match the captured speaker, task and deadline
/// are used (with a single trailing period stripped from the deadline); on
/// no match the whole content becomes the task, attributed to
/// `declared_speaker` or "Unknown" with a deadline of "soon".
pub fn extract_action(content: &str, declared_speaker: Option<&str>) -> Action {
    if let Some(captures) = ACTION_PATTERN.captures(content) {
        let deadline = captures[3].trim();
        let deadline = deadline.strip_suffix('.').unwrap_or(deadline);

        return Action {
            speaker: captures[1].to_string(),
            task: captures[2].trim().to_string(),
            deadline: Some(deadline.to_string()),
            confidence: default_confidence(),
        };
    }

    Action {
        speaker: declared_speaker.unwrap_or("Unknown").to_string(),
        task: content.to_string(),
        deadline: Some("soon".to_string()),
        confidence: default_confidence(),
    }
}

/// Strip a leading case-insensitive "Decision:" prefix and surrounding
/// whitespace from an intervention's content.
///
/// Returns the remaining decision text, which may be empty; callers discard
/// empty results rather than emitting a blank decision.
pub fn decision_text(content: &str) -> String {
    const PREFIX: &str = "decision:";

    let trimmed = content.trim();
    let rest = match trimmed.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => &trimmed[PREFIX.len()..],
        _ => trimmed,
    };

    rest.trim().to_string()
}
