//! Entrants: players, pairs and teams as they appear in brackets and rosters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a player, pair or team. Conflicts are detected on this, never on names.
pub type EntrantId = Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Recorded gender of a registered player.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// A registered entrant eligible for some event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    /// `None` when registration did not record it.
    pub gender: Option<Gender>,
}

impl Entrant {
    pub fn new(name: impl Into<String>, gender: Option<Gender>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
        }
    }
}
