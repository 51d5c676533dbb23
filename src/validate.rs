use std::collections::HashMap;

use thiserror::Error;

/// Submission failures. All are user-correctable and terminal for the
/// attempt: nothing is persisted and the form keeps its in-progress values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("missing selections: {}. Every position must be filled.", .0.join(", "))]
    IncompleteSelection(Vec<String>),
    #[error("duplicate selections: {}. Each entry must appear exactly once.", .0.join(", "))]
    DuplicateSelection(Vec<String>),
    #[error("prediction can't be empty")]
    EmptyText,
}

/// Check a full slot sequence before persisting. Completeness first: every
/// unset slot is reported together. Uniqueness only runs on a complete
/// sequence, and still runs even though the narrowing option lists make
/// duplicates unreachable through the UI.
pub fn validate_slots(
    labels: &[String],
    slots: &[Option<String>],
) -> Result<Vec<String>, SubmitError> {
    let missing: Vec<String> = labels
        .iter()
        .zip(slots.iter())
        .filter(|(_, slot)| slot.is_none())
        .map(|(label, _)| label.clone())
        .collect();
    if !missing.is_empty() {
        return Err(SubmitError::IncompleteSelection(missing));
    }

    let values: Vec<String> = slots.iter().flatten().cloned().collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in &values {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let mut duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(value, _)| value.to_string())
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort();
        return Err(SubmitError::DuplicateSelection(duplicates));
    }

    Ok(values)
}

/// Freeform text must be non-empty after trimming; returns the trimmed text.
pub fn validate_text(text: &str) -> Result<String, SubmitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyText);
    }
    Ok(trimmed.to_string())
}
