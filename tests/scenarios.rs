use std::path::PathBuf;

use chrono::NaiveDate;

use f126_terminal::catalog::Catalog;
use f126_terminal::picks::{self, ChampionshipHalf};
use f126_terminal::table::UNSET;
use f126_terminal::validate::{SubmitError, validate_slots, validate_text};

fn seed_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    Catalog::load(&path).expect("seed data should load")
}

#[test]
fn drivers_half_submission_backfills_constructor_slots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = seed_catalog();
    let drivers = catalog.driver_names();
    assert_eq!(drivers.len(), 22);

    picks::submit_season_half(dir.path(), "Seth", ChampionshipHalf::Drivers, &drivers)
        .expect("submit");

    let table = picks::load_season(dir.path()).expect("reload");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.get(0, "user"), Some("Seth"));
    let stored = picks::season_slots(&table, "Seth", ChampionshipHalf::Drivers)
        .expect("row exists");
    assert_eq!(stored, drivers);
    let constructors = picks::season_slots(&table, "Seth", ChampionshipHalf::Constructors)
        .expect("row exists");
    assert_eq!(constructors, vec![UNSET.to_string(); 11]);
}

#[test]
fn later_constructor_submission_keeps_saved_driver_half() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = seed_catalog();
    let drivers = catalog.driver_names();
    let constructors = catalog.constructor_names();

    picks::submit_season_half(dir.path(), "Seth", ChampionshipHalf::Drivers, &drivers)
        .expect("drivers");
    picks::submit_season_half(
        dir.path(),
        "Seth",
        ChampionshipHalf::Constructors,
        &constructors,
    )
    .expect("constructors");

    let table = picks::load_season(dir.path()).expect("reload");
    assert_eq!(table.rows.len(), 1, "one row per user");
    assert_eq!(
        picks::season_slots(&table, "Seth", ChampionshipHalf::Drivers).expect("row"),
        drivers
    );
    assert_eq!(
        picks::season_slots(&table, "Seth", ChampionshipHalf::Constructors).expect("row"),
        constructors
    );
}

#[test]
fn forced_duplicate_race_pick_fails_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = seed_catalog();
    let mut names = catalog.driver_names();

    // Force P2 to repeat P1, bypassing the narrowing option lists.
    names[1] = names[0].clone();
    let slots: Vec<Option<String>> = names.iter().cloned().map(Some).collect();

    let err = validate_slots(&picks::race_slot_labels(), &slots).unwrap_err();
    assert_eq!(err, SubmitError::DuplicateSelection(vec![names[0].clone()]));

    // Validation failed at the submission boundary, so no table was written.
    assert!(!picks::race_path(dir.path()).exists());
    let table = picks::load_race(dir.path()).expect("empty table");
    assert!(table.rows.is_empty());
}

#[test]
fn race_pick_is_keyed_by_race_and_user() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = seed_catalog();
    let order = catalog.driver_names();

    picks::submit_race(dir.path(), "Bahrain GP", "Colin", &order).expect("first");
    picks::submit_race(dir.path(), "Bahrain GP", "Seth", &order).expect("other user");
    picks::submit_race(dir.path(), "Monaco GP", "Colin", &order).expect("other race");

    let mut reversed = order.clone();
    reversed.reverse();
    picks::submit_race(dir.path(), "Bahrain GP", "Colin", &reversed).expect("overwrite");

    let table = picks::load_race(dir.path()).expect("reload");
    assert_eq!(table.rows.len(), 3, "overwrite did not append");
    assert_eq!(
        picks::race_slots(&table, "Bahrain GP", "Colin").expect("row"),
        reversed
    );
    assert_eq!(
        picks::race_slots(&table, "Bahrain GP", "Seth").expect("row"),
        order
    );
}

#[test]
fn blank_fun_prediction_fails_and_table_is_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(validate_text("   ").unwrap_err(), SubmitError::EmptyText);
    assert!(!picks::fun_path(dir.path()).exists());
}

#[test]
fn fun_predictions_append_and_delete_by_position() {
    let dir = tempfile::tempdir().expect("tempdir");
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");

    picks::submit_fun(dir.path(), "Seth", "Bearman podium before Round 5", date)
        .expect("first");
    picks::submit_fun(dir.path(), "Colin", "Rain, chaos, \"surprise\" winner", date)
        .expect("second");
    picks::submit_fun(dir.path(), "Seth", "Cadillac scores in Vegas", date).expect("third");

    let table = picks::load_fun(dir.path()).expect("reload");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.get(0, "date_created"), Some("03/01/2026"));
    assert_eq!(
        table.get(1, "prediction"),
        Some("Rain, chaos, \"surprise\" winner"),
        "comma and quotes survive the CSV round trip"
    );

    picks::delete_fun_row(dir.path(), 0).expect("delete");
    let table = picks::load_fun(dir.path()).expect("reload");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.get(0, "prediction"), Some("Rain, chaos, \"surprise\" winner"));
    assert_eq!(table.get(1, "prediction"), Some("Cadillac scores in Vegas"));
}
