use std::path::PathBuf;

use f126_terminal::catalog::Catalog;
use f126_terminal::state::{AppState, Focus, Screen};

fn seed_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    Catalog::load(&path).expect("seed data should load")
}

fn fresh_app() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut state = AppState::new(dir.path().to_path_buf(), seed_catalog());
    state.refresh().expect("refresh on empty dir");
    (dir, state)
}

fn fill_active_form(state: &mut AppState) {
    // Drive the form the way the UI does: open the picker per slot and take
    // the first real option, which narrows the lists as it goes.
    for slot in 0..state.active_slot_count() {
        state.slot_selected = slot;
        state.open_picker();
        let picker = state.picker.as_mut().expect("picker open");
        assert!(!picker.options.is_empty(), "slot {slot} has no options left");
        picker.selected = 1;
        state.accept_picker();
    }
}

#[test]
fn refresh_on_empty_dir_yields_empty_tables_and_unset_forms() {
    let (_dir, state) = fresh_app();
    assert!(state.season_table.rows.is_empty());
    assert!(state.race_table.rows.is_empty());
    assert!(state.fun_table.rows.is_empty());
    let form = state.active_form().expect("season form");
    assert!(form.slots().iter().all(|s| s.is_none()));
    assert_eq!(state.current_user(), "Seth");
}

#[test]
fn picker_excludes_values_taken_by_other_slots() {
    let (_dir, mut state) = fresh_app();
    state.slot_selected = 0;
    state.open_picker();
    let first = state.picker.as_ref().expect("picker").options[0].clone();
    state.picker.as_mut().expect("picker").selected = 1;
    state.accept_picker();

    state.slot_selected = 1;
    state.open_picker();
    let picker = state.picker.as_ref().expect("picker");
    assert!(!picker.options.contains(&first), "taken value still offered");

    // Reopening on the taken slot keeps its own value in the list.
    state.slot_selected = 0;
    state.open_picker();
    let picker = state.picker.as_ref().expect("picker");
    assert!(picker.options.contains(&first));
    assert_eq!(picker.selected, 1, "popup opens on the current value");
}

#[test]
fn incomplete_submission_warns_and_persists_nothing() {
    let (_dir, mut state) = fresh_app();
    state.slot_selected = 0;
    state.open_picker();
    state.picker.as_mut().expect("picker").selected = 1;
    state.accept_picker();

    state.submit();
    let log = state.last_log().expect("log line");
    assert!(log.starts_with("[WARN]"), "unexpected log: {log}");
    assert!(log.contains("missing selections"), "unexpected log: {log}");
    assert!(state.season_table.rows.is_empty());
}

#[test]
fn full_season_submission_persists_and_reloads() {
    let (_dir, mut state) = fresh_app();
    fill_active_form(&mut state);
    state.submit();

    let log = state.last_log().expect("log line");
    assert!(log.starts_with("[INFO]"), "unexpected log: {log}");
    assert_eq!(state.season_table.rows.len(), 1);
    assert_eq!(state.season_table.get(0, "user"), Some("Seth"));

    // Constructors' half of the fresh row is all sentinel.
    assert_eq!(state.season_table.get(0, "C1"), Some("-- Select --"));
}

#[test]
fn switching_user_is_a_new_form_key() {
    let (_dir, mut state) = fresh_app();
    state.slot_selected = 0;
    state.open_picker();
    state.picker.as_mut().expect("picker").selected = 1;
    state.accept_picker();
    assert!(state.season_drivers.slot(0).is_some());

    state.cycle_user();
    assert_eq!(state.current_user(), "Colin");
    assert!(
        state.season_drivers.slot(0).is_none(),
        "new key starts from the stored record, not the other user's edits"
    );

    // Back to the first user: the key changed again, so the in-progress edit
    // from before is gone and the form reseeds from disk (nothing stored).
    state.cycle_user();
    assert_eq!(state.current_user(), "Seth");
    assert!(state.season_drivers.slot(0).is_none());
}

#[test]
fn switching_race_reseeds_the_race_form() {
    let (_dir, mut state) = fresh_app();
    state.set_screen(Screen::Race);
    state.race_idx = 0;
    state.sync_forms();

    state.slot_selected = 0;
    state.open_picker();
    state.picker.as_mut().expect("picker").selected = 1;
    state.accept_picker();
    assert!(state.race_form.slot(0).is_some());

    state.cycle_race();
    assert!(state.race_form.slot(0).is_none());
}

#[test]
fn race_submission_prefills_after_user_round_trip() {
    let (_dir, mut state) = fresh_app();
    state.set_screen(Screen::Race);
    state.race_idx = 3;
    state.sync_forms();

    fill_active_form(&mut state);
    let submitted: Vec<String> = state
        .race_form
        .slots()
        .iter()
        .flatten()
        .cloned()
        .collect();
    state.submit();
    assert_eq!(state.race_table.rows.len(), 1);

    // Away and back: the stored record seeds the form again.
    state.cycle_user();
    state.cycle_user();
    let reloaded: Vec<String> = state
        .race_form
        .slots()
        .iter()
        .flatten()
        .cloned()
        .collect();
    assert_eq!(reloaded, submitted);
}

#[test]
fn blank_fun_text_warns_and_keeps_table_unchanged() {
    let (_dir, mut state) = fresh_app();
    state.set_screen(Screen::Fun);
    state.fun_text = "   ".to_string();
    state.submit();

    let log = state.last_log().expect("log line");
    assert!(log.starts_with("[WARN]"), "unexpected log: {log}");
    assert!(state.fun_table.rows.is_empty());
    assert_eq!(state.fun_text, "   ", "in-progress text is kept");

    state.fun_text = "Perez on the podium in Mexico".to_string();
    state.submit();
    assert_eq!(state.fun_table.rows.len(), 1);
    assert!(state.fun_text.is_empty(), "cleared after a successful submit");
}

#[test]
fn deleting_a_record_resets_forms_and_reindexes() {
    let (_dir, mut state) = fresh_app();
    fill_active_form(&mut state);
    state.submit();
    state.cycle_user();
    fill_active_form(&mut state);
    state.submit();
    assert_eq!(state.season_table.rows.len(), 2);

    state.focus = Focus::Records;
    state.record_selected = 0;
    state.delete_selected_record();

    assert_eq!(state.season_table.rows.len(), 1);
    assert_eq!(state.season_table.get(0, "user"), Some("Colin"));
    // The active user's form reseeded from disk after the reset.
    let stored: Vec<&str> = state
        .season_drivers
        .slots()
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    assert_eq!(stored.len(), 22, "Colin's stored picks survive the delete");
}
