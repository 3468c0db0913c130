//! Double-booking detection within a round. Advisory only: never blocks a save.

use crate::models::{EntrantId, GameMatch, MatchId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// An entrant found in more than one match of the same round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ConflictWarning {
    pub entrant: EntrantId,
    pub round: u32,
    /// Every match of the round the entrant occupies, ascending by id.
    pub matches: Vec<MatchId>,
}

/// First identity that appears twice, in iteration order.
pub fn first_duplicate<I>(ids: I) -> Option<EntrantId>
where
    I: IntoIterator<Item = EntrantId>,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

/// Warnings for entrants of `candidate` who also sit in another match of its round.
///
/// `round_matches` may or may not contain the candidate itself; its stored copy is ignored in
/// favour of the candidate being checked. An entrant in both slots of one match is not reported.
pub fn detect_conflicts(round_matches: &[GameMatch], candidate: &GameMatch) -> Vec<ConflictWarning> {
    let entrants: BTreeSet<EntrantId> = candidate.entrants().collect();
    let mut warnings = Vec::new();

    for entrant in entrants {
        let mut matches: Vec<MatchId> = round_matches
            .iter()
            .filter(|m| m.id != candidate.id && m.round == candidate.round)
            .filter(|m| m.entrants().any(|e| e == entrant))
            .map(|m| m.id)
            .collect();
        if matches.is_empty() {
            continue;
        }
        matches.push(candidate.id);
        matches.sort();
        matches.dedup();
        warnings.push(ConflictWarning {
            entrant,
            round: candidate.round,
            matches,
        });
    }

    if !warnings.is_empty() {
        log::warn!(
            "Match {} shares {} entrant(s) with other matches of round {}",
            candidate.id,
            warnings.len(),
            candidate.round
        );
    }
    warnings
}

/// Warnings for every entrant occupying slots in two or more distinct matches of one round.
/// Sorted by round, then entrant id.
pub fn detect_round_conflicts(round_matches: &[GameMatch]) -> Vec<ConflictWarning> {
    let mut seen: BTreeMap<(u32, EntrantId), BTreeSet<MatchId>> = BTreeMap::new();
    for m in round_matches {
        for entrant in m.entrants() {
            seen.entry((m.round, entrant)).or_default().insert(m.id);
        }
    }

    seen.into_iter()
        .filter(|(_, matches)| matches.len() > 1)
        .map(|((round, entrant), matches)| ConflictWarning {
            entrant,
            round,
            matches: matches.into_iter().collect(),
        })
        .collect()
}
