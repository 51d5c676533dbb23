use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use crate::catalog::{Catalog, Race};
use crate::picks::{self, ChampionshipHalf, GRID_SIZE, NUM_CONSTRUCTOR_SLOTS, NUM_DRIVER_SLOTS};
use crate::selection::FormState;
use crate::table::Table;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Season,
    Race,
    Fun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Records,
}

/// Popup listing the options for the slot under the cursor. Selection 0 is
/// always the clear entry (the unset sentinel).
#[derive(Debug, Clone)]
pub struct PickerState {
    pub slot: usize,
    pub options: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub focus: Focus,
    pub data_dir: PathBuf,
    pub catalog: Catalog,
    pub users: Vec<String>,
    pub user_idx: usize,
    pub race_idx: usize,
    pub season_half: ChampionshipHalf,
    pub season_drivers: FormState,
    pub season_constructors: FormState,
    pub race_form: FormState,
    pub slot_selected: usize,
    pub picker: Option<PickerState>,
    pub fun_text: String,
    pub fun_editing: bool,
    pub season_table: Table,
    pub race_table: Table,
    pub fun_table: Table,
    pub record_selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(data_dir: PathBuf, catalog: Catalog) -> Self {
        let today = Local::now().date_naive();
        let race_idx = catalog
            .next_race(today)
            .and_then(|next| catalog.races.iter().position(|r| r.round == next.round))
            .unwrap_or(0);
        Self {
            screen: Screen::Season,
            focus: Focus::Form,
            data_dir,
            catalog,
            users: users_env_or_default(),
            user_idx: 0,
            race_idx,
            season_half: ChampionshipHalf::Drivers,
            season_drivers: FormState::new(NUM_DRIVER_SLOTS),
            season_constructors: FormState::new(NUM_CONSTRUCTOR_SLOTS),
            race_form: FormState::new(GRID_SIZE),
            slot_selected: 0,
            picker: None,
            fun_text: String::new(),
            fun_editing: false,
            season_table: Table::with_columns(&picks::season_columns()),
            race_table: Table::with_columns(&picks::race_columns()),
            fun_table: Table::with_columns(&picks::fun_columns()),
            record_selected: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= 200 {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }

    pub fn current_user(&self) -> &str {
        self.users
            .get(self.user_idx)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn current_race(&self) -> Option<&Race> {
        self.catalog.races.get(self.race_idx)
    }

    /// Reload all pick tables from disk and re-seed forms whose key changed.
    /// Called at startup and after every mutation so the records panes and
    /// prefills always reflect what is actually stored.
    pub fn refresh(&mut self) -> Result<()> {
        self.season_table = picks::load_season(&self.data_dir)?;
        self.race_table = picks::load_race(&self.data_dir)?;
        self.fun_table = picks::load_fun(&self.data_dir)?;
        self.sync_forms();
        self.clamp_cursors();
        Ok(())
    }

    /// Initialize each form for its current key. `FormState` makes this a
    /// no-op when the key is unchanged, so in-progress edits survive.
    pub fn sync_forms(&mut self) {
        let user = self.current_user().to_string();
        let driver_names = self.catalog.driver_names();
        let constructor_names = self.catalog.constructor_names();

        let stored = picks::season_slots(&self.season_table, &user, ChampionshipHalf::Drivers);
        self.season_drivers.initialize(
            &format!("season-drivers:{user}"),
            stored.as_deref(),
            &driver_names,
        );
        let stored =
            picks::season_slots(&self.season_table, &user, ChampionshipHalf::Constructors);
        self.season_constructors.initialize(
            &format!("season-constructors:{user}"),
            stored.as_deref(),
            &constructor_names,
        );

        if let Some(race) = self.current_race().map(|r| r.name.clone()) {
            let stored = picks::race_slots(&self.race_table, &race, &user);
            self.race_form.initialize(
                &format!("race:{race}|{user}"),
                stored.as_deref(),
                &driver_names,
            );
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = Focus::Form;
        self.slot_selected = 0;
        self.record_selected = 0;
        self.picker = None;
        self.fun_editing = false;
    }

    pub fn cycle_user(&mut self) {
        if self.users.is_empty() {
            return;
        }
        self.user_idx = (self.user_idx + 1) % self.users.len();
        self.sync_forms();
    }

    pub fn cycle_race(&mut self) {
        if self.catalog.races.is_empty() {
            return;
        }
        self.race_idx = (self.race_idx + 1) % self.catalog.races.len();
        self.sync_forms();
    }

    pub fn toggle_season_half(&mut self) {
        self.season_half = match self.season_half {
            ChampionshipHalf::Drivers => ChampionshipHalf::Constructors,
            ChampionshipHalf::Constructors => ChampionshipHalf::Drivers,
        };
        self.slot_selected = 0;
        self.picker = None;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Form => Focus::Records,
            Focus::Records => Focus::Form,
        };
        self.picker = None;
    }

    pub fn active_slot_count(&self) -> usize {
        match self.screen {
            Screen::Season => match self.season_half {
                ChampionshipHalf::Drivers => NUM_DRIVER_SLOTS,
                ChampionshipHalf::Constructors => NUM_CONSTRUCTOR_SLOTS,
            },
            Screen::Race => GRID_SIZE,
            Screen::Fun => 0,
        }
    }

    pub fn active_form(&self) -> Option<&FormState> {
        match self.screen {
            Screen::Season => Some(match self.season_half {
                ChampionshipHalf::Drivers => &self.season_drivers,
                ChampionshipHalf::Constructors => &self.season_constructors,
            }),
            Screen::Race => Some(&self.race_form),
            Screen::Fun => None,
        }
    }

    fn active_form_mut(&mut self) -> Option<&mut FormState> {
        match self.screen {
            Screen::Season => Some(match self.season_half {
                ChampionshipHalf::Drivers => &mut self.season_drivers,
                ChampionshipHalf::Constructors => &mut self.season_constructors,
            }),
            Screen::Race => Some(&mut self.race_form),
            Screen::Fun => None,
        }
    }

    fn active_catalog_names(&self) -> Vec<String> {
        match self.screen {
            Screen::Season => match self.season_half {
                ChampionshipHalf::Drivers => self.catalog.driver_names(),
                ChampionshipHalf::Constructors => self.catalog.constructor_names(),
            },
            Screen::Race => self.catalog.driver_names(),
            Screen::Fun => Vec::new(),
        }
    }

    pub fn records_len(&self) -> usize {
        match self.screen {
            Screen::Season => self.season_table.rows.len(),
            Screen::Race => self.race_table.rows.len(),
            Screen::Fun => self.fun_table.rows.len(),
        }
    }

    pub fn select_next(&mut self) {
        if let Some(picker) = &mut self.picker {
            if picker.selected < picker.options.len() {
                picker.selected += 1;
            }
            return;
        }
        match self.focus {
            Focus::Form => {
                let count = self.active_slot_count();
                if count > 0 && self.slot_selected + 1 < count {
                    self.slot_selected += 1;
                }
            }
            Focus::Records => {
                let count = self.records_len();
                if count > 0 && self.record_selected + 1 < count {
                    self.record_selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(picker) = &mut self.picker {
            picker.selected = picker.selected.saturating_sub(1);
            return;
        }
        match self.focus {
            Focus::Form => self.slot_selected = self.slot_selected.saturating_sub(1),
            Focus::Records => self.record_selected = self.record_selected.saturating_sub(1),
        }
    }

    /// Open the option popup for the slot under the cursor. The list is the
    /// catalog minus values taken by other slots, with this slot's own value
    /// still offered; entry 0 clears the slot.
    pub fn open_picker(&mut self) {
        let slot = self.slot_selected;
        let names = self.active_catalog_names();
        let Some(form) = self.active_form() else {
            return;
        };
        let options = form.available_options_for(slot, &names);
        let selected = form
            .slot(slot)
            .and_then(|current| options.iter().position(|o| o == current))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.picker = Some(PickerState {
            slot,
            options,
            selected,
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn accept_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let value = if picker.selected == 0 {
            None
        } else {
            picker.options.get(picker.selected - 1).cloned()
        };
        if let Some(form) = self.active_form_mut() {
            form.set_slot(picker.slot, value);
        }
    }

    pub fn clear_selected_slot(&mut self) {
        let slot = self.slot_selected;
        if let Some(form) = self.active_form_mut() {
            form.set_slot(slot, None);
        }
    }

    pub fn submit(&mut self) {
        match self.screen {
            Screen::Season => self.submit_season(),
            Screen::Race => self.submit_race(),
            Screen::Fun => self.submit_fun(),
        }
    }

    fn submit_season(&mut self) {
        let user = self.current_user().to_string();
        let half = self.season_half;
        let labels = picks::half_labels(half);
        let form = match half {
            ChampionshipHalf::Drivers => &self.season_drivers,
            ChampionshipHalf::Constructors => &self.season_constructors,
        };
        let values = match validate::validate_slots(&labels, form.slots()) {
            Ok(values) => values,
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                return;
            }
        };
        match picks::submit_season_half(&self.data_dir, &user, half, &values) {
            Ok(()) => {
                let what = match half {
                    ChampionshipHalf::Drivers => "Drivers' Championship",
                    ChampionshipHalf::Constructors => "Constructors' Championship",
                };
                self.push_log(format!("[INFO] {what} prediction saved for {user}"));
                self.reload_after_mutation();
            }
            Err(err) => self.push_log(format!("[WARN] save failed: {err}")),
        }
    }

    fn submit_race(&mut self) {
        let user = self.current_user().to_string();
        let Some(race) = self.current_race().map(|r| r.name.clone()) else {
            self.push_log("[WARN] no race selected");
            return;
        };
        let labels = picks::race_slot_labels();
        let values = match validate::validate_slots(&labels, self.race_form.slots()) {
            Ok(values) => values,
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                return;
            }
        };
        match picks::submit_race(&self.data_dir, &race, &user, &values) {
            Ok(()) => {
                self.push_log(format!("[INFO] Prediction for {race} saved for {user}"));
                self.reload_after_mutation();
            }
            Err(err) => self.push_log(format!("[WARN] save failed: {err}")),
        }
    }

    fn submit_fun(&mut self) {
        let user = self.current_user().to_string();
        let text = match validate::validate_text(&self.fun_text) {
            Ok(text) => text,
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                return;
            }
        };
        let today = Local::now().date_naive();
        match picks::submit_fun(&self.data_dir, &user, &text, today) {
            Ok(()) => {
                self.fun_text.clear();
                self.fun_editing = false;
                self.push_log("[INFO] Prediction submitted");
                self.reload_after_mutation();
            }
            Err(err) => self.push_log(format!("[WARN] save failed: {err}")),
        }
    }

    /// Delete the record under the cursor. The positional index comes from
    /// the freshly rendered table and is never cached across a mutation;
    /// forms tied to the table are reset so the next sync reseeds from disk.
    pub fn delete_selected_record(&mut self) {
        let index = self.record_selected;
        if index >= self.records_len() {
            return;
        }
        let result = match self.screen {
            Screen::Season => picks::delete_season_row(&self.data_dir, index).map(|()| {
                self.season_drivers.reset();
                self.season_constructors.reset();
            }),
            Screen::Race => picks::delete_race_row(&self.data_dir, index).map(|()| {
                self.race_form.reset();
            }),
            Screen::Fun => picks::delete_fun_row(&self.data_dir, index),
        };
        match result {
            Ok(()) => {
                self.push_log("[INFO] Prediction deleted");
                self.reload_after_mutation();
            }
            Err(err) => self.push_log(format!("[WARN] delete failed: {err}")),
        }
    }

    fn reload_after_mutation(&mut self) {
        if let Err(err) = self.refresh() {
            self.push_log(format!("[WARN] reload failed: {err}"));
        }
    }

    fn clamp_cursors(&mut self) {
        let records = self.records_len();
        if records == 0 {
            self.record_selected = 0;
        } else if self.record_selected >= records {
            self.record_selected = records - 1;
        }
        let slots = self.active_slot_count();
        if slots > 0 && self.slot_selected >= slots {
            self.slot_selected = slots - 1;
        }
    }
}

fn users_env_or_default() -> Vec<String> {
    const DEFAULT_USERS: &[&str] = &["Seth", "Colin"];
    let fallback = || -> Vec<String> { DEFAULT_USERS.iter().map(|u| u.to_string()).collect() };
    match std::env::var("F1_USERS") {
        Ok(raw) => {
            let users: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect();
            if users.is_empty() { fallback() } else { users }
        }
        Err(_) => fallback(),
    }
}
