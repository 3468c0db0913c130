//! Federation tournament core: score validation, bracket advancement, round conflicts and
//! roster formation, plus the repository contract and orchestration around them.

pub mod error;
pub mod events;
pub mod logic;
pub mod models;
pub mod repository;
pub mod seed;
pub mod service;

pub use error::{
    AdvanceError, RepositoryError, RosterError, ScoreError, ServiceError, ValidationReport,
};
pub use events::{MatchEvents, MatchUpdated, UpdateCause};
pub use logic::{
    advance, bye_walkover, canonical_result, destination_slot, detect_conflicts,
    detect_round_conflicts, first_duplicate, validate_roster, validate_score, Advance,
    AdvancePlan, ConflictWarning, NoOpReason, ReportedScore,
};
pub use models::{
    Entrant, EntrantId, EventCategory, FormedRoster, GameMatch, Gender, GenderConstraint,
    MatchId, MatchPatch, MatchResult, MatchStatus, Occupant, OutcomeKind, RosterCandidate,
    RosterKind, RosterMember, SeriesFormat, Side, TournamentId,
};
pub use repository::{EntrantSource, InMemoryEntrants, InMemoryMatches, MatchRepository};
pub use seed::{load_matches_csv, SeedError};
pub use service::{BracketService, ReportOutcome, DEFAULT_MAX_ATTEMPTS};
