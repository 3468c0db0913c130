//! In-memory stores behind `RwLock`s, for the web binary and for tests.

use super::{EntrantSource, MatchRepository};
use crate::error::RepositoryError;
use crate::models::{
    Entrant, EventCategory, GameMatch, MatchId, MatchPatch, MatchStatus, TournamentId,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// Matches by id. Enforces versioning, monotonic status, and result iff finished.
#[derive(Debug, Default)]
pub struct InMemoryMatches {
    matches: RwLock<HashMap<MatchId, GameMatch>>,
}

impl InMemoryMatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(matches: impl IntoIterator<Item = GameMatch>) -> Self {
        Self {
            matches: RwLock::new(matches.into_iter().map(|m| (m.id, m)).collect()),
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let g = self.matches.read().map_err(|_| RepositoryError::Unavailable)?;
        Ok(g.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

impl MatchRepository for InMemoryMatches {
    fn get_match(&self, id: MatchId) -> Result<GameMatch, RepositoryError> {
        let g = self.matches.read().map_err(|_| RepositoryError::Unavailable)?;
        g.get(&id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn matches_by_round(
        &self,
        tournament_id: TournamentId,
        round: u32,
    ) -> Result<Vec<GameMatch>, RepositoryError> {
        let g = self.matches.read().map_err(|_| RepositoryError::Unavailable)?;
        let mut found: Vec<GameMatch> = g
            .values()
            .filter(|m| m.tournament_id == tournament_id && m.round == round)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.id);
        Ok(found)
    }

    fn apply_match_update(
        &self,
        id: MatchId,
        expected_version: u64,
        patch: &MatchPatch,
    ) -> Result<GameMatch, RepositoryError> {
        let mut g = self.matches.write().map_err(|_| RepositoryError::Unavailable)?;
        let stored = g.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        if stored.version != expected_version {
            return Err(RepositoryError::StaleWrite {
                id,
                expected: expected_version,
                actual: stored.version,
            });
        }

        let mut next = stored.clone();
        next.apply(patch);
        if next.status < stored.status {
            return Err(RepositoryError::StatusRegression {
                id,
                from: stored.status,
                to: next.status,
            });
        }
        if next.result.is_some() != (next.status == MatchStatus::Finished) {
            return Err(RepositoryError::ResultWithoutFinish(id));
        }

        *stored = next.clone();
        Ok(next)
    }
}

/// Registered entrants per tournament. Every registrant is eligible for every category;
/// gender rules are left to the roster validator so it can name the offending member.
#[derive(Debug, Default)]
pub struct InMemoryEntrants {
    entrants: RwLock<HashMap<TournamentId, Vec<Entrant>>>,
}

impl InMemoryEntrants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, tournament_id: TournamentId, entrant: Entrant) -> Result<(), RepositoryError> {
        let mut g = self.entrants.write().map_err(|_| RepositoryError::Unavailable)?;
        g.entry(tournament_id).or_default().push(entrant);
        Ok(())
    }
}

impl EntrantSource for InMemoryEntrants {
    fn list_eligible_entrants(
        &self,
        tournament_id: TournamentId,
        _category: &EventCategory,
    ) -> Result<Vec<Entrant>, RepositoryError> {
        let g = self.entrants.read().map_err(|_| RepositoryError::Unavailable)?;
        Ok(g.get(&tournament_id).cloned().unwrap_or_default())
    }
}
