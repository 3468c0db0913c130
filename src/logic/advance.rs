//! Bracket advancement: carries a finished match's winner into its successor.
//!
//! Nothing here mutates a match. The advancer returns a plan that the caller applies under a
//! compare-and-set on the destination's version, together with the source's own write.

use crate::error::AdvanceError;
use crate::logic::score::canonical_result;
use crate::models::{
    GameMatch, MatchId, MatchPatch, MatchResult, MatchStatus, Occupant, OutcomeKind, Side,
};
use serde::Serialize;

/// Slot write to apply to the destination match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AdvancePlan {
    pub source: MatchId,
    pub destination: MatchId,
    pub slot: Side,
    /// Destination version the plan was computed against.
    pub expected_version: u64,
    pub occupant: Occupant,
    /// What the slot held before; differs from a placeholder only on winner corrections.
    pub replaced: Occupant,
}

impl AdvancePlan {
    pub fn patch(&self) -> MatchPatch {
        MatchPatch::place(self.slot, self.occupant)
    }

    pub fn is_correction(&self) -> bool {
        matches!(self.replaced, Occupant::Entrant { .. })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// The source is the final; there is nowhere to advance to.
    Final,
    /// The destination already holds this winner from this source.
    AlreadyAdvanced,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Advance {
    Plan(AdvancePlan),
    NoOp { reason: NoOpReason },
}

/// Slot of `destination` fed by `source`.
///
/// The persisted `source_match_ids` order decides. A source missing from that list is placed
/// after the listed ones, among its same-round siblings feeding the same destination, by
/// ascending match id.
pub fn destination_slot(
    source: &GameMatch,
    destination: &GameMatch,
    round_matches: &[GameMatch],
) -> Result<Side, AdvanceError> {
    let unroutable = AdvanceError::UnroutableSource {
        source_match: source.id,
        destination: destination.id,
    };
    let listed = |id: MatchId| destination.source_match_ids.iter().position(|s| *s == id);

    if let Some(position) = listed(source.id) {
        return Side::from_position(position).ok_or(unroutable);
    }

    let mut feeders: Vec<MatchId> = round_matches
        .iter()
        .filter(|m| m.round == source.round && m.next_match_id == Some(destination.id))
        .map(|m| m.id)
        .collect();
    if !feeders.contains(&source.id) {
        feeders.push(source.id);
    }
    feeders.sort_by_key(|id| (listed(*id).unwrap_or(usize::MAX), *id));

    feeders
        .iter()
        .position(|id| *id == source.id)
        .and_then(Side::from_position)
        .ok_or(unroutable)
}

/// Plan the move of `source`'s winner into `destination`.
///
/// `round_matches` are the matches of the source's round; they are only consulted when the
/// destination does not list the source in `source_match_ids`.
pub fn advance(
    source: &GameMatch,
    destination: &GameMatch,
    round_matches: &[GameMatch],
) -> Result<Advance, AdvanceError> {
    let result = match (&source.status, &source.result) {
        (MatchStatus::Finished, Some(result)) => result,
        _ => return Err(AdvanceError::MatchNotFinished { match_id: source.id }),
    };
    let Some(next) = source.next_match_id else {
        return Ok(Advance::NoOp {
            reason: NoOpReason::Final,
        });
    };
    if destination.id != next {
        return Err(AdvanceError::DestinationMismatch {
            source_match: source.id,
            destination: destination.id,
        });
    }

    let occupant = match *source.slot(result.winner) {
        Occupant::Entrant { id, .. } => Occupant::Entrant {
            id,
            advanced_from: Some(source.id),
        },
        Occupant::Bye => Occupant::Bye,
        Occupant::Empty | Occupant::WinnerOf { .. } => {
            return Err(AdvanceError::WinnerUnresolved { match_id: source.id })
        }
    };

    let slot = destination_slot(source, destination, round_matches)?;
    let current = *destination.slot(slot);
    let conflict = AdvanceError::SlotConflict {
        destination: destination.id,
        slot,
        source_match: source.id,
    };

    match current {
        Occupant::Empty => {}
        Occupant::WinnerOf { source: s } if s == source.id => {}
        Occupant::Entrant {
            advanced_from: Some(from),
            ..
        } if from == source.id => {
            if current == occupant {
                return Ok(Advance::NoOp {
                    reason: NoOpReason::AlreadyAdvanced,
                });
            }
            // The source's result was corrected. Only a destination that has not started
            // may have its competitor swapped.
            if destination.status != MatchStatus::Scheduled {
                return Err(conflict);
            }
            log::warn!(
                "Match {} winner changed; replacing {:?} in match {} slot {:?}",
                source.id,
                current,
                destination.id,
                slot
            );
        }
        // A bye carries no provenance. Imported brackets never seed a slot fed by a listed
        // source, so there a bye can only have come from that source.
        Occupant::Bye if occupant == Occupant::Bye => {
            return Ok(Advance::NoOp {
                reason: NoOpReason::AlreadyAdvanced,
            });
        }
        _ => return Err(conflict),
    }

    log::debug!(
        "Advance {:?} from match {} into match {} slot {:?}",
        occupant,
        source.id,
        destination.id,
        slot
    );
    Ok(Advance::Plan(AdvancePlan {
        source: source.id,
        destination: destination.id,
        slot,
        expected_version: destination.version,
        occupant,
        replaced: current,
    }))
}

/// Result to record for a match decided by a bye, if it is one.
///
/// A bye against a competitor is a walkover for the competitor. Two byes finish with slot A
/// carrying the bye forward so the next round resolves the same way.
pub fn bye_walkover(m: &GameMatch) -> Option<MatchResult> {
    if m.status == MatchStatus::Finished {
        return None;
    }
    let winner = match (&m.slot_a, &m.slot_b) {
        (Occupant::Entrant { .. }, Occupant::Bye) => Side::A,
        (Occupant::Bye, Occupant::Entrant { .. }) => Side::B,
        (Occupant::Bye, Occupant::Bye) => Side::A,
        _ => return None,
    };
    Some(canonical_result(m.series_format, winner, OutcomeKind::Walkover))
}
