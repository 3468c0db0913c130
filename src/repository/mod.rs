//! Storage contracts the engine consumes, plus in-memory implementations.

mod memory;

pub use memory::{InMemoryEntrants, InMemoryMatches};

use crate::error::RepositoryError;
use crate::models::{Entrant, EventCategory, GameMatch, MatchId, MatchPatch, TournamentId};

/// Match records reachable by id.
pub trait MatchRepository {
    fn get_match(&self, id: MatchId) -> Result<GameMatch, RepositoryError>;

    /// All matches of one round of a tournament, in no particular order.
    fn matches_by_round(
        &self,
        tournament_id: TournamentId,
        round: u32,
    ) -> Result<Vec<GameMatch>, RepositoryError>;

    /// Optimistic-concurrency write: applies `patch` only if the stored version equals
    /// `expected_version`, otherwise fails with `StaleWrite`. Returns the updated match.
    fn apply_match_update(
        &self,
        id: MatchId,
        expected_version: u64,
        patch: &MatchPatch,
    ) -> Result<GameMatch, RepositoryError>;
}

/// Registration data: who may enter which event.
pub trait EntrantSource {
    fn list_eligible_entrants(
        &self,
        tournament_id: TournamentId,
        category: &EventCategory,
    ) -> Result<Vec<Entrant>, RepositoryError>;
}
