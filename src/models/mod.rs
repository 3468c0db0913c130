//! Data structures for bracket progression and roster formation.

mod entrant;
mod game;
mod roster;

pub use entrant::{Entrant, EntrantId, Gender, TournamentId};
pub use game::{
    GameMatch, MatchId, MatchPatch, MatchResult, MatchStatus, Occupant, OutcomeKind,
    SeriesFormat, Side,
};
pub use roster::{
    EventCategory, FormedRoster, GenderConstraint, RosterCandidate, RosterKind, RosterMember,
};
