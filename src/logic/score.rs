//! Score validation: checks a reported series against its best-of-N format.

use crate::error::ScoreError;
use crate::models::{MatchResult, OutcomeKind, SeriesFormat, Side};
use serde::{Deserialize, Serialize};

/// A result as reported by a referee or administrator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportedScore {
    pub series_format: SeriesFormat,
    #[serde(default)]
    pub sets_won_a: u8,
    #[serde(default)]
    pub sets_won_b: u8,
    #[serde(default)]
    pub outcome: OutcomeKind,
    /// Required for walkovers and retirements; optional for normal results.
    #[serde(default)]
    pub winner: Option<Side>,
}

impl ReportedScore {
    pub fn normal(series_format: SeriesFormat, sets_won_a: u8, sets_won_b: u8) -> Self {
        Self {
            series_format,
            sets_won_a,
            sets_won_b,
            outcome: OutcomeKind::Normal,
            winner: None,
        }
    }

    pub fn walkover(series_format: SeriesFormat, winner: Side) -> Self {
        Self {
            series_format,
            sets_won_a: 0,
            sets_won_b: 0,
            outcome: OutcomeKind::Walkover,
            winner: Some(winner),
        }
    }
}

/// Validate a reported series and return the result to store.
///
/// Normal results must have exactly one side at the majority threshold and the other below it.
/// Walkovers and retirements need a declared winner; the stored score is the canonical `T-0`.
pub fn validate_score(reported: &ReportedScore) -> Result<MatchResult, ScoreError> {
    let format = reported.series_format;
    let t = format.majority();
    let (a, b) = (reported.sets_won_a, reported.sets_won_b);
    let invalid = ScoreError::InvalidSeriesScore {
        format,
        sets_won_a: a,
        sets_won_b: b,
    };

    match reported.outcome {
        OutcomeKind::Normal => {
            let from_sets = match (a == t && b < t, b == t && a < t) {
                (true, false) => Side::A,
                (false, true) => Side::B,
                _ => return Err(invalid),
            };
            if let Some(declared) = reported.winner {
                if declared != from_sets {
                    return Err(ScoreError::WinnerMismatch {
                        declared,
                        from_sets,
                    });
                }
            }
            Ok(MatchResult {
                winner: from_sets,
                series_format: format,
                sets_won_a: a,
                sets_won_b: b,
                outcome: OutcomeKind::Normal,
            })
        }
        OutcomeKind::Walkover | OutcomeKind::Retired => {
            let winner = reported.winner.ok_or(ScoreError::MissingWinner)?;
            let (won, lost) = match winner {
                Side::A => (a, b),
                Side::B => (b, a),
            };
            // Partial sets are fine; a loser who already took the series is not.
            if lost >= t || won > t {
                return Err(invalid);
            }
            Ok(canonical_result(format, winner, reported.outcome))
        }
    }
}

/// `T-0` in favour of `winner`, used for walkovers, retirements and byes.
pub fn canonical_result(format: SeriesFormat, winner: Side, outcome: OutcomeKind) -> MatchResult {
    let t = format.majority();
    let (sets_won_a, sets_won_b) = match winner {
        Side::A => (t, 0),
        Side::B => (0, t),
    };
    MatchResult {
        winner,
        series_format: format,
        sets_won_a,
        sets_won_b,
        outcome,
    }
}
