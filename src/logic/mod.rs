//! Bracket and roster rules: score validation, advancement, conflicts, roster formation.

mod advance;
mod conflicts;
mod roster;
mod score;

pub use advance::{advance, bye_walkover, destination_slot, Advance, AdvancePlan, NoOpReason};
pub use conflicts::{detect_conflicts, detect_round_conflicts, first_duplicate, ConflictWarning};
pub use roster::validate_roster;
pub use score::{canonical_result, validate_score, ReportedScore};
