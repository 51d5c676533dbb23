use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use crate::table::Table;

pub const NUM_DRIVER_SLOTS: usize = 22;
pub const NUM_CONSTRUCTOR_SLOTS: usize = 11;
/// Race predictions cover the full grid.
pub const GRID_SIZE: usize = 22;

pub const CREATED_DATE_FORMAT: &str = "%m/%d/%Y";

/// The two halves of a season pick are submitted independently; a
/// Constructors' submission must never clobber saved Drivers' values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChampionshipHalf {
    Drivers,
    Constructors,
}

pub fn driver_slot_labels() -> Vec<String> {
    (1..=NUM_DRIVER_SLOTS).map(|i| format!("D{i}")).collect()
}

pub fn constructor_slot_labels() -> Vec<String> {
    (1..=NUM_CONSTRUCTOR_SLOTS).map(|i| format!("C{i}")).collect()
}

pub fn race_slot_labels() -> Vec<String> {
    (1..=GRID_SIZE).map(|i| format!("P{i}")).collect()
}

pub fn half_labels(half: ChampionshipHalf) -> Vec<String> {
    match half {
        ChampionshipHalf::Drivers => driver_slot_labels(),
        ChampionshipHalf::Constructors => constructor_slot_labels(),
    }
}

pub fn season_columns() -> Vec<String> {
    let mut cols = vec!["user".to_string()];
    cols.extend(driver_slot_labels());
    cols.extend(constructor_slot_labels());
    cols
}

pub fn race_columns() -> Vec<String> {
    let mut cols = vec!["race".to_string(), "user".to_string()];
    cols.extend(race_slot_labels());
    cols
}

pub fn fun_columns() -> Vec<String> {
    vec![
        "user".to_string(),
        "prediction".to_string(),
        "date_created".to_string(),
    ]
}

pub fn season_path(data_dir: &Path) -> PathBuf {
    data_dir.join("season_predictions.csv")
}

pub fn race_path(data_dir: &Path) -> PathBuf {
    data_dir.join("race_predictions.csv")
}

pub fn fun_path(data_dir: &Path) -> PathBuf {
    data_dir.join("fun_predictions.csv")
}

pub fn load_season(data_dir: &Path) -> Result<Table> {
    Table::load_or_create(&season_path(data_dir), &season_columns())
}

pub fn load_race(data_dir: &Path) -> Result<Table> {
    Table::load_or_create(&race_path(data_dir), &race_columns())
}

pub fn load_fun(data_dir: &Path) -> Result<Table> {
    Table::load_or_create(&fun_path(data_dir), &fun_columns())
}

/// Raw stored slot values for one half of a user's season pick, in slot
/// order. `None` when the user has no row yet. Sentinel and stale values are
/// returned as stored; `FormState::initialize` filters them against the
/// catalog.
pub fn season_slots(table: &Table, user: &str, half: ChampionshipHalf) -> Option<Vec<String>> {
    let row = table.find_row(&[("user", user)])?;
    Some(slot_values(table, row, &half_labels(half)))
}

/// Raw stored slot values for one (race, user) pick, in slot order.
pub fn race_slots(table: &Table, race: &str, user: &str) -> Option<Vec<String>> {
    let row = table.find_row(&[("race", race), ("user", user)])?;
    Some(slot_values(table, row, &race_slot_labels()))
}

fn slot_values(table: &Table, row: usize, labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| table.get(row, label).unwrap_or_default().to_string())
        .collect()
}

/// Overwrite one half of a user's season row, leaving the other half's
/// columns untouched. A first submission creates the row with the missing
/// half filled with the sentinel, so stored rows are always fully populated.
pub fn apply_season_half(
    table: &mut Table,
    user: &str,
    half: ChampionshipHalf,
    values: &[String],
) -> Result<()> {
    let labels = half_labels(half);
    let record: Vec<(&str, &str)> = labels
        .iter()
        .map(String::as_str)
        .zip(values.iter().map(String::as_str))
        .collect();
    table.upsert(&[("user", user)], &record)
}

pub fn apply_race(table: &mut Table, race: &str, user: &str, values: &[String]) -> Result<()> {
    let labels = race_slot_labels();
    let record: Vec<(&str, &str)> = labels
        .iter()
        .map(String::as_str)
        .zip(values.iter().map(String::as_str))
        .collect();
    table.upsert(&[("race", race), ("user", user)], &record)
}

pub fn append_fun(table: &mut Table, user: &str, text: &str, created: NaiveDate) -> Result<()> {
    let date = created.format(CREATED_DATE_FORMAT).to_string();
    table.append(&[("user", user), ("prediction", text), ("date_created", &date)])
}

pub fn submit_season_half(
    data_dir: &Path,
    user: &str,
    half: ChampionshipHalf,
    values: &[String],
) -> Result<()> {
    let mut table = load_season(data_dir)?;
    apply_season_half(&mut table, user, half, values)?;
    table.save(&season_path(data_dir))
}

pub fn submit_race(data_dir: &Path, race: &str, user: &str, values: &[String]) -> Result<()> {
    let mut table = load_race(data_dir)?;
    apply_race(&mut table, race, user, values)?;
    table.save(&race_path(data_dir))
}

pub fn submit_fun(data_dir: &Path, user: &str, text: &str, created: NaiveDate) -> Result<()> {
    let mut table = load_fun(data_dir)?;
    append_fun(&mut table, user, text, created)?;
    table.save(&fun_path(data_dir))
}

pub fn delete_season_row(data_dir: &Path, index: usize) -> Result<()> {
    let mut table = load_season(data_dir)?;
    table.delete(index)?;
    table.save(&season_path(data_dir))
}

pub fn delete_race_row(data_dir: &Path, index: usize) -> Result<()> {
    let mut table = load_race(data_dir)?;
    table.delete(index)?;
    table.save(&race_path(data_dir))
}

pub fn delete_fun_row(data_dir: &Path, index: usize) -> Result<()> {
    let mut table = load_fun(data_dir)?;
    table.delete(index)?;
    table.save(&fun_path(data_dir))
}
