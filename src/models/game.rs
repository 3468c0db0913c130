//! Match (bracket node), its slots, result and the patch shape used to update it.

use crate::models::entrant::{EntrantId, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two competitor positions in a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Slot fed by the source at `position` of a destination's `source_match_ids`.
    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Side::A),
            1 => Some(Side::B),
            _ => None,
        }
    }
}

/// Best-of-N series length. Stored on the match, never re-derived from a score.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum SeriesFormat {
    #[default]
    #[serde(rename = "best_of_5")]
    BestOf5,
    #[serde(rename = "best_of_7")]
    BestOf7,
}

impl SeriesFormat {
    pub fn sets(self) -> u8 {
        match self {
            SeriesFormat::BestOf5 => 5,
            SeriesFormat::BestOf7 => 7,
        }
    }

    /// Sets needed to win the series: ceil(N / 2).
    pub fn majority(self) -> u8 {
        self.sets().div_ceil(2)
    }
}

/// How a match was decided.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    #[default]
    Normal,
    Walkover,
    Retired,
}

/// Lifecycle of a match. Ordered so that regressions can be detected with `<`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Finished,
}

/// What currently sits in a slot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Occupant {
    #[default]
    Empty,
    /// No real competitor; the other slot passes through automatically.
    Bye,
    /// Placeholder: filled by the winner of the named match.
    WinnerOf { source: MatchId },
    /// A concrete player or team. `advanced_from` is set when the bracket
    /// advancer placed it, and is `None` for initial seeding.
    Entrant {
        id: EntrantId,
        advanced_from: Option<MatchId>,
    },
}

impl Occupant {
    pub fn seeded(id: EntrantId) -> Self {
        Occupant::Entrant {
            id,
            advanced_from: None,
        }
    }

    pub fn entrant_id(&self) -> Option<EntrantId> {
        match self {
            Occupant::Entrant { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// True for a player/team or a bye: something that can be carried to the next round.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Occupant::Bye | Occupant::Entrant { .. })
    }
}

/// A decided series.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Side,
    pub series_format: SeriesFormat,
    pub sets_won_a: u8,
    pub sets_won_b: u8,
    pub outcome: OutcomeKind,
}

/// One bracket node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1 = earliest round.
    pub round: u32,
    pub series_format: SeriesFormat,
    pub slot_a: Occupant,
    pub slot_b: Occupant,
    /// Present iff `status` is `Finished`.
    pub result: Option<MatchResult>,
    pub status: MatchStatus,
    /// Successor consuming this match's winner; `None` for the final.
    pub next_match_id: Option<MatchId>,
    /// Matches feeding `slot_a` then `slot_b`, in that order.
    #[serde(default)]
    pub source_match_ids: Vec<MatchId>,
    /// Optimistic-concurrency token, bumped on every applied patch.
    #[serde(default)]
    pub version: u64,
}

impl GameMatch {
    pub fn new(tournament_id: TournamentId, round: u32, series_format: SeriesFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            series_format,
            slot_a: Occupant::Empty,
            slot_b: Occupant::Empty,
            result: None,
            status: MatchStatus::Scheduled,
            next_match_id: None,
            source_match_ids: Vec::new(),
            version: 0,
        }
    }

    pub fn slot(&self, side: Side) -> &Occupant {
        match side {
            Side::A => &self.slot_a,
            Side::B => &self.slot_b,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Concrete entrants in this match, slot A first. Byes and placeholders are skipped.
    pub fn entrants(&self) -> impl Iterator<Item = EntrantId> + '_ {
        [&self.slot_a, &self.slot_b]
            .into_iter()
            .filter_map(Occupant::entrant_id)
    }

    /// Apply a patch in place and bump the version. Invariant checks live in the repository.
    pub fn apply(&mut self, patch: &MatchPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(result) = patch.result {
            self.result = Some(result);
        }
        if let Some(occupant) = patch.slot_a {
            self.slot_a = occupant;
        }
        if let Some(occupant) = patch.slot_b {
            self.slot_b = occupant;
        }
        self.version += 1;
    }
}

/// Partial update for a match. `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPatch {
    pub status: Option<MatchStatus>,
    pub result: Option<MatchResult>,
    pub slot_a: Option<Occupant>,
    pub slot_b: Option<Occupant>,
}

impl MatchPatch {
    /// Record a decided series: sets the result and moves the match to `Finished`.
    pub fn finish(result: MatchResult) -> Self {
        Self {
            status: Some(MatchStatus::Finished),
            result: Some(result),
            ..Self::default()
        }
    }

    pub fn place(side: Side, occupant: Occupant) -> Self {
        match side {
            Side::A => Self {
                slot_a: Some(occupant),
                ..Self::default()
            },
            Side::B => Self {
                slot_b: Some(occupant),
                ..Self::default()
            },
        }
    }
}
