//! Roster candidate sets: proposed pairs and teams awaiting validation.

use crate::models::entrant::{Entrant, EntrantId, Gender};
use serde::{Deserialize, Serialize};

/// Whether the event is contested by pairs or by teams.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    Pair,
    Team,
}

/// Gender rule of an event category. An event with no rule at all is `None` on the category,
/// which is not the same thing as `Mixed`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderConstraint {
    Male,
    Female,
    Mixed,
}

impl GenderConstraint {
    /// Gender every member must have, if the constraint pins one.
    pub fn required_gender(self) -> Option<Gender> {
        match self {
            GenderConstraint::Male => Some(Gender::Male),
            GenderConstraint::Female => Some(Gender::Female),
            GenderConstraint::Mixed => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventCategory {
    pub kind: RosterKind,
    #[serde(default)]
    pub gender_constraint: Option<GenderConstraint>,
    pub min_size: usize,
    pub max_size: usize,
}

impl EventCategory {
    pub fn pair(gender_constraint: Option<GenderConstraint>) -> Self {
        Self {
            kind: RosterKind::Pair,
            gender_constraint,
            min_size: 2,
            max_size: 2,
        }
    }

    pub fn team(gender_constraint: Option<GenderConstraint>, min_size: usize, max_size: usize) -> Self {
        Self {
            kind: RosterKind::Team,
            gender_constraint,
            min_size,
            max_size,
        }
    }
}

/// One proposed member of a roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub id: EntrantId,
    pub display_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl From<&Entrant> for RosterMember {
    fn from(e: &Entrant) -> Self {
        Self {
            id: e.id,
            display_name: e.name.clone(),
            gender: e.gender,
        }
    }
}

/// A proposed team or pair. Exists only while it is being validated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterCandidate {
    pub category: EventCategory,
    pub members: Vec<RosterMember>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A validated roster, ready to be persisted as a team or pair record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormedRoster {
    pub kind: RosterKind,
    pub name: String,
    pub members: Vec<EntrantId>,
}
