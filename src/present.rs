use std::collections::HashMap;

use once_cell::sync::Lazy;
use ratatui::style::Color;

use crate::catalog::Catalog;
use crate::table::UNSET;

/// One line of a rendered pick list. `position` is the 1-based index into the
/// original slot sequence, so skipped (unset) slots never shift the numbers
/// of the slots after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub position: usize,
    pub name: String,
    pub team: Option<String>,
}

/// Render a driver-slot record: unset slots are skipped, each surviving
/// entry carries its team from the catalog (absent for a stale name).
pub fn rank_drivers(slots: &[String], catalog: &Catalog) -> Vec<RankedEntry> {
    rank(slots, |name| catalog.team_of(name).map(str::to_string))
}

/// Constructor records carry no separate team; the name already is the team.
pub fn rank_constructors(slots: &[String]) -> Vec<RankedEntry> {
    rank(slots, |_| None)
}

fn rank(slots: &[String], team_of: impl Fn(&str) -> Option<String>) -> Vec<RankedEntry> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty() && name.as_str() != UNSET)
        .map(|(i, name)| RankedEntry {
            position: i + 1,
            name: name.clone(),
            team: team_of(name),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosBadge {
    Gold,
    Silver,
    Bronze,
    Points,
    Rest,
}

pub fn pos_badge(position: usize) -> PosBadge {
    match position {
        1 => PosBadge::Gold,
        2 => PosBadge::Silver,
        3 => PosBadge::Bronze,
        4..=10 => PosBadge::Points,
        _ => PosBadge::Rest,
    }
}

pub fn badge_color(badge: PosBadge) -> Color {
    match badge {
        PosBadge::Gold => Color::Rgb(0xFF, 0xD7, 0x00),
        PosBadge::Silver => Color::Rgb(0xC0, 0xC0, 0xC0),
        PosBadge::Bronze => Color::Rgb(0xCD, 0x7F, 0x32),
        PosBadge::Points => Color::Rgb(0x2D, 0x6A, 0x4F),
        PosBadge::Rest => Color::Rgb(0x44, 0x44, 0x44),
    }
}

static TEAM_COLORS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    HashMap::from([
        ("McLaren", Color::Rgb(0xFF, 0x87, 0x00)),
        ("Mercedes", Color::Rgb(0x00, 0xD2, 0xBE)),
        ("Red Bull", Color::Rgb(0x1E, 0x41, 0xFF)),
        ("Ferrari", Color::Rgb(0xDC, 0x00, 0x00)),
        ("Williams", Color::Rgb(0x00, 0x5A, 0xFF)),
        ("Racing Bulls", Color::Rgb(0x2B, 0x45, 0x62)),
        ("Aston Martin", Color::Rgb(0x00, 0x6F, 0x62)),
        ("Haas", Color::Rgb(0xB6, 0xBA, 0xBD)),
        ("Audi", Color::Rgb(0xC0, 0xC0, 0xC0)),
        ("Alpine", Color::Rgb(0x00, 0x90, 0xFF)),
        ("Cadillac", Color::Rgb(0xFF, 0xD7, 0x00)),
    ])
});

pub fn team_color(team: &str) -> Color {
    TEAM_COLORS
        .get(team)
        .copied()
        .unwrap_or(Color::Rgb(0x66, 0x66, 0x66))
}
