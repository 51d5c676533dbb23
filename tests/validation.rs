use f126_terminal::validate::{SubmitError, validate_slots, validate_text};

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

fn filled(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn complete_duplicate_free_sequence_passes_through_unchanged() {
    let slots = filled(&["Alpha", "Bravo", "Charlie"]);
    let values = validate_slots(&labels("P", 3), &slots).expect("should validate");
    assert_eq!(values, vec!["Alpha", "Bravo", "Charlie"]);
}

#[test]
fn incomplete_reports_every_missing_slot() {
    let slots = vec![
        Some("Alpha".to_string()),
        None,
        Some("Bravo".to_string()),
        None,
    ];
    let err = validate_slots(&labels("D", 4), &slots).unwrap_err();
    assert_eq!(
        err,
        SubmitError::IncompleteSelection(vec!["D2".to_string(), "D4".to_string()])
    );
}

#[test]
fn forced_duplicates_report_each_offending_value_once() {
    // Bypasses the narrowing UI on purpose.
    let slots = filled(&["Max", "Max", "Alpha", "Bravo", "Bravo", "Max"]);
    let err = validate_slots(&labels("P", 6), &slots).unwrap_err();
    assert_eq!(
        err,
        SubmitError::DuplicateSelection(vec!["Bravo".to_string(), "Max".to_string()])
    );
}

#[test]
fn completeness_is_checked_before_uniqueness() {
    let slots = vec![Some("Max".to_string()), Some("Max".to_string()), None];
    let err = validate_slots(&labels("P", 3), &slots).unwrap_err();
    assert!(matches!(err, SubmitError::IncompleteSelection(_)));
}

#[test]
fn error_messages_enumerate_all_violations() {
    let slots = vec![None, None, Some("Alpha".to_string())];
    let err = validate_slots(&labels("C", 3), &slots).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("C1"));
    assert!(message.contains("C2"));

    let slots = filled(&["Max", "Max"]);
    let err = validate_slots(&labels("P", 2), &slots).unwrap_err();
    assert!(err.to_string().contains("Max"));
}

#[test]
fn text_is_trimmed_and_must_be_non_empty() {
    assert_eq!(
        validate_text("  Bearman on pole  ").expect("should validate"),
        "Bearman on pole"
    );
    assert_eq!(validate_text("   ").unwrap_err(), SubmitError::EmptyText);
    assert_eq!(validate_text("").unwrap_err(), SubmitError::EmptyText);
    assert_eq!(validate_text("\n\t ").unwrap_err(), SubmitError::EmptyText);
}
