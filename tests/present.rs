use std::path::PathBuf;

use f126_terminal::catalog::Catalog;
use f126_terminal::present::{PosBadge, pos_badge, rank_constructors, rank_drivers};
use f126_terminal::table::UNSET;

fn fixture_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    Catalog::load(&path).expect("fixtures should load")
}

#[test]
fn rank_skips_unset_slots_without_shifting_positions() {
    let catalog = fixture_catalog();
    let slots = vec![
        "Max Verstappen".to_string(),
        UNSET.to_string(),
        "Lando Norris".to_string(),
        String::new(),
        "Oliver Bearman".to_string(),
    ];
    let ranked = rank_drivers(&slots, &catalog);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].position, 1);
    assert_eq!(ranked[1].position, 3, "unset slot does not shift P3");
    assert_eq!(ranked[2].position, 5);
    assert_eq!(ranked[0].name, "Max Verstappen");
    assert_eq!(ranked[0].team.as_deref(), Some("Red Bull"));
}

#[test]
fn rank_keeps_stale_names_but_without_a_team() {
    let catalog = fixture_catalog();
    let slots = vec!["Retired Driver".to_string(), "Lando Norris".to_string()];
    let ranked = rank_drivers(&slots, &catalog);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].team, None);
    assert_eq!(ranked[1].team.as_deref(), Some("McLaren"));
}

#[test]
fn constructor_entries_carry_no_separate_team() {
    let slots = vec!["McLaren".to_string(), UNSET.to_string(), "Haas".to_string()];
    let ranked = rank_constructors(&slots);
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|e| e.team.is_none()));
    assert_eq!(ranked[1].position, 3);
}

#[test]
fn position_badges_follow_the_podium_and_points_cut() {
    assert_eq!(pos_badge(1), PosBadge::Gold);
    assert_eq!(pos_badge(2), PosBadge::Silver);
    assert_eq!(pos_badge(3), PosBadge::Bronze);
    assert_eq!(pos_badge(4), PosBadge::Points);
    assert_eq!(pos_badge(10), PosBadge::Points);
    assert_eq!(pos_badge(11), PosBadge::Rest);
    assert_eq!(pos_badge(22), PosBadge::Rest);
}
