//! Error kinds returned by the validators, the advancer and the repository.

use crate::models::{EntrantId, Gender, MatchId, MatchStatus, SeriesFormat, Side};
use serde::Serialize;
use thiserror::Error;

/// Why a reported series score was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScoreError {
    #[error("{sets_won_a}-{sets_won_b} is not a valid {format:?} score")]
    InvalidSeriesScore {
        format: SeriesFormat,
        sets_won_a: u8,
        sets_won_b: u8,
    },
    #[error("no winning side was declared")]
    MissingWinner,
    #[error("declared winner {declared:?} contradicts the sets, which give {from_sets:?}")]
    WinnerMismatch { declared: Side, from_sets: Side },
}

/// Why a winner could not be carried into its successor match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AdvanceError {
    #[error("match {destination} slot {slot:?} already holds a competitor not placed by match {source_match}")]
    SlotConflict {
        destination: MatchId,
        slot: Side,
        source_match: MatchId,
    },
    #[error("match {match_id} is not finished")]
    MatchNotFinished { match_id: MatchId },
    #[error("winning slot of match {match_id} holds no competitor")]
    WinnerUnresolved { match_id: MatchId },
    #[error("match {source_match} cannot be routed to slot A or B of match {destination}")]
    UnroutableSource {
        source_match: MatchId,
        destination: MatchId,
    },
    #[error("match {destination} is not the successor of match {source_match}")]
    DestinationMismatch {
        source_match: MatchId,
        destination: MatchId,
    },
}

/// Which roster rule failed first.
#[derive(Clone, Debug, Eq, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RosterError {
    #[error("entrant {entrant} is listed more than once")]
    DuplicateEntrant { entrant: EntrantId },
    #[error("roster has {size} members, allowed range is {min}..={max}")]
    RosterSizeOutOfRange { size: usize, min: usize, max: usize },
    #[error("entrant {entrant} does not satisfy the {required:?} constraint")]
    GenderConstraintViolation { entrant: EntrantId, required: Gender },
    #[error("a team needs a name")]
    MissingTeamName,
}

/// Failures reported by a match store.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RepositoryError {
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error("stale write on match {id}: expected version {expected}, found {actual}")]
    StaleWrite { id: MatchId, expected: u64, actual: u64 },
    #[error("match {id} cannot go from {from:?} back to {to:?}")]
    StatusRegression {
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    },
    #[error("match {0} would have a result without being finished, or be finished without one")]
    ResultWithoutFinish(MatchId),
    #[error("match store unavailable")]
    Unavailable,
}

/// Errors raised by the orchestration layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Advance(#[from] AdvanceError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("match {0} does not have both competitors yet")]
    NotReady(MatchId),
    #[error("match {0} has a bye and is decided without a score")]
    DecidedByBye(MatchId),
    #[error("entrant {0} is not eligible for this event")]
    Ineligible(EntrantId),
    #[error("gave up on match {0} after {1} stale writes")]
    Contended(MatchId, u32),
}

impl ServiceError {
    /// States an operator should look at, as opposed to routine, user-correctable input.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            ServiceError::Advance(AdvanceError::SlotConflict { .. })
                | ServiceError::Repository(RepositoryError::StaleWrite { .. })
                | ServiceError::Contended(..)
        )
    }
}

/// Tagged verdict of a validator, shaped for rendering back to the reporting user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_slot: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationReport {
    pub fn ok(winner_slot: Option<Side>) -> Self {
        Self {
            valid: true,
            winner_slot,
            reason: None,
            message: None,
        }
    }

    pub fn rejected<E: Serialize + std::fmt::Display>(err: &E) -> Self {
        Self {
            valid: false,
            winner_slot: None,
            reason: serde_json::to_value(err).ok(),
            message: Some(err.to_string()),
        }
    }
}
