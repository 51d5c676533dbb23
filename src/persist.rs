use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::{AppState, Screen};

const CACHE_DIR: &str = "f126_terminal";
const CACHE_FILE: &str = "session.json";
const CACHE_VERSION: u32 = 1;

/// Last screen, user, and race across runs. Best-effort: every failure path
/// silently falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    version: u32,
    screen: String,
    user: String,
    race: String,
}

pub fn load_into_state(state: &mut AppState) {
    let Some(path) = session_path() else {
        return;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return;
    };
    let Ok(session) = serde_json::from_str::<SessionFile>(&raw) else {
        return;
    };
    if session.version != CACHE_VERSION {
        return;
    }

    if let Some(screen) = screen_from_key(&session.screen) {
        state.screen = screen;
    }
    // Only restore a user or race that still exists.
    if let Some(idx) = state.users.iter().position(|u| *u == session.user) {
        state.user_idx = idx;
    }
    if let Some(idx) = state
        .catalog
        .races
        .iter()
        .position(|r| r.name == session.race)
    {
        state.race_idx = idx;
    }
}

pub fn save_from_state(state: &AppState) {
    let Some(path) = session_path() else {
        return;
    };
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let session = SessionFile {
        version: CACHE_VERSION,
        screen: screen_key(state.screen).to_string(),
        user: state.current_user().to_string(),
        race: state
            .current_race()
            .map(|r| r.name.clone())
            .unwrap_or_default(),
    };

    if let Ok(json) = serde_json::to_string(&session) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, &path);
        }
    }
}

fn session_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn screen_key(screen: Screen) -> &'static str {
    match screen {
        Screen::Season => "season",
        Screen::Race => "race",
        Screen::Fun => "fun",
    }
}

fn screen_from_key(key: &str) -> Option<Screen> {
    match key {
        "season" => Some(Screen::Season),
        "race" => Some(Screen::Race),
        "fun" => Some(Screen::Fun),
        _ => None,
    }
}
