use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::table::Table;

pub const RACE_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    pub name: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Race {
    pub round: u32,
    pub name: String,
    pub date: NaiveDate,
}

/// Read-only reference data. Loaded once per refresh cycle; never written
/// back by this program.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub drivers: Vec<Driver>,
    pub constructors: Vec<Constructor>,
    pub races: Vec<Race>,
}

impl Catalog {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let drivers = load_drivers(&Table::load(&data_dir.join("drivers.csv"))?)?;
        let constructors =
            load_constructors(&Table::load(&data_dir.join("constructors.csv"))?)?;
        let races = load_races(&Table::load(&data_dir.join("races.csv"))?)?;
        Ok(Self {
            drivers,
            constructors,
            races,
        })
    }

    pub fn driver_names(&self) -> Vec<String> {
        self.drivers.iter().map(|d| d.name.clone()).collect()
    }

    pub fn constructor_names(&self) -> Vec<String> {
        self.constructors.iter().map(|c| c.name.clone()).collect()
    }

    pub fn team_of(&self, driver: &str) -> Option<&str> {
        self.drivers
            .iter()
            .find(|d| d.name == driver)
            .map(|d| d.team.as_str())
    }

    /// "Name  —  Team" display form; falls back to the bare name for a
    /// driver the catalog no longer knows.
    pub fn driver_label(&self, driver: &str) -> String {
        match self.team_of(driver) {
            Some(team) => format!("{driver}  —  {team}"),
            None => driver.to_string(),
        }
    }

    pub fn race_label(&self, race: &Race) -> String {
        format!("{}  —  {}", race.round, race.name)
    }

    /// First race on or after `today`, used as the default race selection.
    pub fn next_race(&self, today: NaiveDate) -> Option<&Race> {
        self.races.iter().find(|r| r.date >= today)
    }
}

fn load_drivers(table: &Table) -> Result<Vec<Driver>> {
    let name_col = table
        .column_index("Driver Name")
        .context("drivers table missing 'Driver Name'")?;
    let team_col = table
        .column_index("Driver Team")
        .context("drivers table missing 'Driver Team'")?;
    Ok(table
        .rows
        .iter()
        .map(|row| Driver {
            name: row[name_col].clone(),
            team: row[team_col].clone(),
        })
        .collect())
}

fn load_constructors(table: &Table) -> Result<Vec<Constructor>> {
    let name_col = table
        .column_index("Team Name")
        .context("constructors table missing 'Team Name'")?;
    Ok(table
        .rows
        .iter()
        .map(|row| Constructor {
            name: row[name_col].clone(),
        })
        .collect())
}

fn load_races(table: &Table) -> Result<Vec<Race>> {
    let round_col = table
        .column_index("Round Number")
        .context("races table missing 'Round Number'")?;
    let name_col = table
        .column_index("Race Name")
        .context("races table missing 'Race Name'")?;
    let date_col = table
        .column_index("Race Date")
        .context("races table missing 'Race Date'")?;
    let mut races = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let round: u32 = row[round_col]
            .trim()
            .parse()
            .with_context(|| format!("bad round number '{}'", row[round_col]))?;
        let date = NaiveDate::parse_from_str(row[date_col].trim(), RACE_DATE_FORMAT)
            .with_context(|| format!("bad race date '{}'", row[date_col]))?;
        races.push(Race {
            round,
            name: row[name_col].clone(),
            date,
        });
    }
    // Round number defines display and selection order.
    races.sort_by_key(|r| r.round);
    Ok(races)
}
