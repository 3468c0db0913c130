//! Integration tests for score validation against best-of-N formats.

use federation_bracket::{
    validate_score, OutcomeKind, ReportedScore, ScoreError, SeriesFormat, Side,
};
use proptest::prelude::*;

fn is_valid(format: SeriesFormat, a: u8, b: u8) -> bool {
    validate_score(&ReportedScore::normal(format, a, b)).is_ok()
}

#[test]
fn best_of_5_accepts_exactly_the_majority_scores() {
    for (a, b) in [(3, 0), (3, 1), (3, 2), (0, 3), (1, 3), (2, 3)] {
        assert!(is_valid(SeriesFormat::BestOf5, a, b), "{a}-{b} should be valid");
    }
    for (a, b) in [(3, 3), (4, 1), (2, 2), (0, 0), (4, 0), (2, 1)] {
        assert!(!is_valid(SeriesFormat::BestOf5, a, b), "{a}-{b} should be invalid");
    }
}

#[test]
fn best_of_7_accepts_exactly_the_majority_scores() {
    for (a, b) in [(4, 0), (4, 1), (4, 2), (4, 3), (0, 4), (1, 4), (2, 4), (3, 4)] {
        assert!(is_valid(SeriesFormat::BestOf7, a, b), "{a}-{b} should be valid");
    }
    for (a, b) in [(3, 0), (4, 4), (5, 2), (3, 3)] {
        assert!(!is_valid(SeriesFormat::BestOf7, a, b), "{a}-{b} should be invalid");
    }
}

#[test]
fn normal_result_reports_winner_and_keeps_sets() {
    let result = validate_score(&ReportedScore::normal(SeriesFormat::BestOf5, 1, 3)).unwrap();
    assert_eq!(result.winner, Side::B);
    assert_eq!((result.sets_won_a, result.sets_won_b), (1, 3));
    assert_eq!(result.outcome, OutcomeKind::Normal);
}

#[test]
fn invalid_score_is_tagged() {
    let err = validate_score(&ReportedScore::normal(SeriesFormat::BestOf5, 3, 3)).unwrap_err();
    assert_eq!(
        err,
        ScoreError::InvalidSeriesScore {
            format: SeriesFormat::BestOf5,
            sets_won_a: 3,
            sets_won_b: 3
        }
    );
}

#[test]
fn declared_winner_must_agree_with_sets() {
    let mut reported = ReportedScore::normal(SeriesFormat::BestOf5, 3, 1);
    reported.winner = Some(Side::B);
    assert_eq!(
        validate_score(&reported),
        Err(ScoreError::WinnerMismatch {
            declared: Side::B,
            from_sets: Side::A
        })
    );
    reported.winner = Some(Side::A);
    assert!(validate_score(&reported).is_ok());
}

#[test]
fn walkover_without_winner_is_rejected() {
    let mut reported = ReportedScore::walkover(SeriesFormat::BestOf7, Side::A);
    reported.winner = None;
    assert_eq!(validate_score(&reported), Err(ScoreError::MissingWinner));
}

#[test]
fn walkover_gets_canonical_score() {
    let result = validate_score(&ReportedScore::walkover(SeriesFormat::BestOf7, Side::B)).unwrap();
    assert_eq!(result.winner, Side::B);
    assert_eq!((result.sets_won_a, result.sets_won_b), (0, 4));
    assert_eq!(result.outcome, OutcomeKind::Walkover);
}

#[test]
fn retirement_keeps_winner_and_canonical_score() {
    let reported = ReportedScore {
        series_format: SeriesFormat::BestOf5,
        sets_won_a: 2,
        sets_won_b: 1,
        outcome: OutcomeKind::Retired,
        winner: Some(Side::B),
    };
    let result = validate_score(&reported).unwrap();
    assert_eq!(result.winner, Side::B);
    assert_eq!((result.sets_won_a, result.sets_won_b), (0, 3));
    assert_eq!(result.outcome, OutcomeKind::Retired);
}

#[test]
fn retirement_by_a_loser_who_already_won_is_rejected() {
    let reported = ReportedScore {
        series_format: SeriesFormat::BestOf5,
        sets_won_a: 3,
        sets_won_b: 0,
        outcome: OutcomeKind::Retired,
        winner: Some(Side::B),
    };
    assert!(matches!(
        validate_score(&reported),
        Err(ScoreError::InvalidSeriesScore { .. })
    ));
}

fn format_strategy() -> impl Strategy<Value = SeriesFormat> {
    prop_oneof![Just(SeriesFormat::BestOf5), Just(SeriesFormat::BestOf7)]
}

proptest! {
    /// Valid iff exactly one side is at the threshold and the other below it.
    #[test]
    fn prop_normal_valid_iff_majority_rule(format in format_strategy(), a in 0u8..10, b in 0u8..10) {
        let t = format.majority();
        let expected = (a == t && b < t) || (b == t && a < t);
        prop_assert_eq!(is_valid(format, a, b), expected);
    }

    /// Walkovers with a declared winner and non-conflicting sets are valid and scored T-0.
    #[test]
    fn prop_walkover_is_canonical(
        format in format_strategy(),
        winner in prop_oneof![Just(Side::A), Just(Side::B)],
        won in 0u8..4,
        lost in 0u8..3,
    ) {
        let t = format.majority();
        prop_assume!(won <= t && lost < t);
        let (a, b) = match winner { Side::A => (won, lost), Side::B => (lost, won) };
        let reported = ReportedScore {
            series_format: format,
            sets_won_a: a,
            sets_won_b: b,
            outcome: OutcomeKind::Walkover,
            winner: Some(winner),
        };
        let result = validate_score(&reported).unwrap();
        prop_assert_eq!(result.winner, winner);
        prop_assert_eq!(result.sets_won_a.max(result.sets_won_b), t);
        prop_assert_eq!(result.sets_won_a.min(result.sets_won_b), 0);
    }
}
