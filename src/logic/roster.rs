//! Roster formation: decides whether a candidate set may become a team or pair.

use crate::error::RosterError;
use crate::logic::conflicts::first_duplicate;
use crate::models::{FormedRoster, RosterCandidate, RosterKind};

/// Validate a candidate team or pair.
///
/// Rules run in order and stop at the first failure:
/// 1. members are distinct by identity;
/// 2. member count is within `[min_size, max_size]`;
/// 3. a `male`/`female` constraint holds for every member (`mixed` and no constraint skip this);
/// 4. teams carry a non-blank name; pairs get one synthesised when absent.
pub fn validate_roster(candidate: &RosterCandidate) -> Result<FormedRoster, RosterError> {
    let category = &candidate.category;

    if let Some(entrant) = first_duplicate(candidate.members.iter().map(|m| m.id)) {
        return Err(RosterError::DuplicateEntrant { entrant });
    }

    let size = candidate.members.len();
    if size < category.min_size || size > category.max_size {
        return Err(RosterError::RosterSizeOutOfRange {
            size,
            min: category.min_size,
            max: category.max_size,
        });
    }

    if let Some(required) = category.gender_constraint.and_then(|c| c.required_gender()) {
        if let Some(m) = candidate.members.iter().find(|m| m.gender != Some(required)) {
            return Err(RosterError::GenderConstraintViolation {
                entrant: m.id,
                required,
            });
        }
    }

    let given = candidate
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let name = match (category.kind, given) {
        (_, Some(n)) => n.to_string(),
        (RosterKind::Team, None) => return Err(RosterError::MissingTeamName),
        (RosterKind::Pair, None) => candidate
            .members
            .iter()
            .map(|m| m.display_name.trim())
            .collect::<Vec<_>>()
            .join(" / "),
    };

    Ok(FormedRoster {
        kind: category.kind,
        name,
        members: candidate.members.iter().map(|m| m.id).collect(),
    })
}
