//! Integration tests for round double-booking detection.

use federation_bracket::{
    detect_conflicts, detect_round_conflicts, first_duplicate, GameMatch, Occupant, SeriesFormat,
};
use uuid::Uuid;

fn round_match(t: Uuid, a: Occupant, b: Occupant) -> GameMatch {
    let mut m = GameMatch::new(t, 1, SeriesFormat::BestOf5);
    m.slot_a = a;
    m.slot_b = b;
    m
}

#[test]
fn player_in_two_matches_is_reported() {
    let t = Uuid::new_v4();
    let p = Uuid::new_v4();
    let m1 = round_match(t, Occupant::seeded(p), Occupant::seeded(Uuid::new_v4()));
    let m2 = round_match(t, Occupant::seeded(Uuid::new_v4()), Occupant::seeded(p));
    let m3 = round_match(t, Occupant::seeded(Uuid::new_v4()), Occupant::Bye);

    let warnings = detect_round_conflicts(&[m1.clone(), m2.clone(), m3]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].entrant, p);
    assert_eq!(warnings[0].round, 1);
    let mut expected = vec![m1.id, m2.id];
    expected.sort();
    assert_eq!(warnings[0].matches, expected);
}

#[test]
fn single_appearance_is_not_reported() {
    let t = Uuid::new_v4();
    let matches: Vec<GameMatch> = (0..4)
        .map(|_| round_match(t, Occupant::seeded(Uuid::new_v4()), Occupant::seeded(Uuid::new_v4())))
        .collect();
    assert!(detect_round_conflicts(&matches).is_empty());
}

#[test]
fn same_match_both_slots_is_not_this_detectors_concern() {
    let t = Uuid::new_v4();
    let p = Uuid::new_v4();
    let m = round_match(t, Occupant::seeded(p), Occupant::seeded(p));
    assert!(detect_round_conflicts(std::slice::from_ref(&m)).is_empty());
    assert!(detect_conflicts(&[m.clone()], &m).is_empty());
}

#[test]
fn byes_and_placeholders_never_conflict() {
    let t = Uuid::new_v4();
    let source = Uuid::new_v4();
    let m1 = round_match(t, Occupant::Bye, Occupant::WinnerOf { source });
    let m2 = round_match(t, Occupant::Bye, Occupant::WinnerOf { source });
    assert!(detect_round_conflicts(&[m1, m2]).is_empty());
}

#[test]
fn candidate_is_checked_against_the_rest_of_its_round() {
    let t = Uuid::new_v4();
    let p = Uuid::new_v4();
    let stored = round_match(t, Occupant::seeded(p), Occupant::seeded(Uuid::new_v4()));
    let mut candidate = round_match(t, Occupant::seeded(Uuid::new_v4()), Occupant::Empty);
    let round = vec![stored.clone(), candidate.clone()];
    assert!(detect_conflicts(&round, &candidate).is_empty());

    // An edit places P into the candidate before the compensating edit removes them elsewhere.
    candidate.slot_b = Occupant::seeded(p);
    let warnings = detect_conflicts(&round, &candidate);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].entrant, p);
    assert!(warnings[0].matches.contains(&stored.id));
    assert!(warnings[0].matches.contains(&candidate.id));
}

#[test]
fn identity_not_display_name_decides() {
    let t = Uuid::new_v4();
    let advanced = Uuid::new_v4();
    let from = Uuid::new_v4();
    let m1 = round_match(
        t,
        Occupant::Entrant {
            id: advanced,
            advanced_from: Some(from),
        },
        Occupant::Empty,
    );
    let m2 = round_match(t, Occupant::seeded(advanced), Occupant::Empty);
    let warnings = detect_round_conflicts(&[m1, m2]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].entrant, advanced);
}

#[test]
fn first_duplicate_finds_repeat() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert_eq!(first_duplicate([a, b]), None);
    assert_eq!(first_duplicate([a, b, a]), Some(a));
}
