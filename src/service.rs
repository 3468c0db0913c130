//! Orchestration over a match repository: report, validate, advance, notify.
//!
//! The rules in `logic` are pure. This layer fetches what they need, applies their output
//! under the repository's compare-and-set, and re-plans from fresh data when a write is stale.

use crate::error::{AdvanceError, RepositoryError, ServiceError, ValidationReport};
use crate::events::{MatchEvents, MatchUpdated, UpdateCause};
use crate::logic::{
    advance, bye_walkover, detect_conflicts, detect_round_conflicts, validate_roster,
    validate_score, Advance, ConflictWarning, NoOpReason, ReportedScore,
};
use crate::models::{
    EntrantId, EventCategory, FormedRoster, GameMatch, MatchId, MatchPatch, MatchResult,
    Occupant, RosterCandidate, RosterMember, TournamentId,
};
use crate::repository::{EntrantSource, MatchRepository};
use serde::Serialize;

/// Default number of fetch-plan-write cycles before giving up on a contended match.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// What happened after a score was accepted.
#[derive(Clone, Debug, Serialize)]
pub struct ReportOutcome {
    /// The source match as stored after the write.
    pub updated: GameMatch,
    /// Advisory double-booking warnings for the match's round.
    pub warnings: Vec<ConflictWarning>,
    pub advance: Advance,
}

pub struct BracketService<R> {
    repo: R,
    events: MatchEvents,
    max_attempts: u32,
}

impl<R: MatchRepository> BracketService<R> {
    pub fn new(repo: R, events: MatchEvents) -> Self {
        Self {
            repo,
            events,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn events(&self) -> &MatchEvents {
        &self.events
    }

    /// Check a report without touching any match.
    pub fn validate_score(&self, reported: &ReportedScore) -> ValidationReport {
        match validate_score(reported) {
            Ok(result) => ValidationReport::ok(Some(result.winner)),
            Err(e) => {
                log::debug!("Rejected score report: {}", e);
                ValidationReport::rejected(&e)
            }
        }
    }

    /// Record a result for `match_id` and carry the winner forward.
    ///
    /// The series format stored on the match is authoritative; the one in the report is ignored.
    /// Double-booking in the round is reported back but never blocks the write.
    ///
    /// Matches holding a bye take no score. The advance is planned against the current
    /// successor before the source is written, so a result the successor cannot accept
    /// (a correction after it has started, a foreign competitor in the slot) writes nothing.
    pub fn report_result(
        &self,
        match_id: MatchId,
        reported: &ReportedScore,
    ) -> Result<ReportOutcome, ServiceError> {
        let m = self.repo.get_match(match_id)?;
        if m.slot_a == Occupant::Bye || m.slot_b == Occupant::Bye {
            log::debug!("Refused score for match {}: decided by bye", match_id);
            return Err(ServiceError::DecidedByBye(match_id));
        }
        let reported = ReportedScore {
            series_format: m.series_format,
            ..*reported
        };
        let result = validate_score(&reported).inspect_err(|e| {
            log::debug!("Rejected score for match {}: {}", match_id, e);
        })?;
        if !(m.slot_a.is_resolved() && m.slot_b.is_resolved()) {
            return Err(ServiceError::NotReady(match_id));
        }

        let round = self.repo.matches_by_round(m.tournament_id, m.round)?;
        let warnings = detect_conflicts(&round, &m);
        self.check_successor_accepts(&m, result, &round)?;

        let updated = self
            .write(&m, &MatchPatch::finish(result), UpdateCause::ScoreReported)
            .inspect_err(|e| {
                if e.needs_attention() {
                    log::error!("Score write for match {} failed: {}", match_id, e);
                }
            })?;
        log::info!(
            "Match {} finished {}-{} ({:?}), winner {:?}",
            updated.id,
            result.sets_won_a,
            result.sets_won_b,
            result.outcome,
            result.winner
        );

        let advance = self.advance_winner(match_id)?;
        Ok(ReportOutcome {
            updated,
            warnings,
            advance,
        })
    }

    /// Move the winner of a finished match into its successor.
    ///
    /// Each attempt re-fetches both matches and re-plans; a stale plan is never replayed.
    pub fn advance_winner(&self, match_id: MatchId) -> Result<Advance, ServiceError> {
        for attempt in 1..=self.max_attempts {
            let source = self.repo.get_match(match_id)?;
            let Some(next) = source.next_match_id else {
                if !source.is_finished() {
                    return Err(AdvanceError::MatchNotFinished { match_id }.into());
                }
                return Ok(Advance::NoOp {
                    reason: NoOpReason::Final,
                });
            };
            let destination = self.repo.get_match(next)?;
            let siblings = if destination.source_match_ids.contains(&source.id) {
                Vec::new()
            } else {
                self.repo.matches_by_round(source.tournament_id, source.round)?
            };

            let plan = match advance(&source, &destination, &siblings) {
                Ok(Advance::Plan(plan)) => plan,
                Ok(noop) => {
                    self.resolve_bye(destination.id)?;
                    return Ok(noop);
                }
                Err(e @ AdvanceError::SlotConflict { .. }) => {
                    log::error!("Cannot advance match {}: {}", match_id, e);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };

            match self.write(&destination, &plan.patch(), UpdateCause::WinnerAdvanced) {
                Ok(updated) => {
                    self.resolve_bye(updated.id)?;
                    return Ok(Advance::Plan(plan));
                }
                Err(ServiceError::Repository(RepositoryError::StaleWrite { actual, .. })) => {
                    log::warn!(
                        "Match {} changed under us (now v{}), re-planning advance of match {} (attempt {})",
                        destination.id,
                        actual,
                        match_id,
                        attempt
                    );
                }
                Err(e) => return Err(e),
            }
        }

        log::error!(
            "Gave up advancing match {} after {} attempts",
            match_id,
            self.max_attempts
        );
        Err(ServiceError::Contended(match_id, self.max_attempts))
    }

    /// Finish a match decided by a bye and advance its occupant. `None` if it is not one.
    pub fn resolve_bye(&self, match_id: MatchId) -> Result<Option<MatchResult>, ServiceError> {
        for _ in 0..self.max_attempts {
            let m = self.repo.get_match(match_id)?;
            let Some(result) = bye_walkover(&m) else {
                return Ok(None);
            };
            match self.write(&m, &MatchPatch::finish(result), UpdateCause::ByeResolved) {
                Ok(_) => {
                    log::info!("Match {} resolved by bye, {:?} advances", match_id, result.winner);
                    self.advance_winner(match_id)?;
                    return Ok(Some(result));
                }
                Err(ServiceError::Repository(RepositoryError::StaleWrite { .. })) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ServiceError::Contended(match_id, self.max_attempts))
    }

    /// Resolve every bye among `match_ids`, e.g. right after a bracket is loaded.
    /// Returns how many matches were finished directly; cascades are not counted.
    pub fn resolve_byes(
        &self,
        match_ids: impl IntoIterator<Item = MatchId>,
    ) -> Result<usize, ServiceError> {
        let mut resolved = 0;
        for id in match_ids {
            if self.resolve_bye(id)?.is_some() {
                resolved += 1;
            }
        }
        if resolved > 0 {
            log::info!("Resolved {} bye match(es)", resolved);
        }
        Ok(resolved)
    }

    /// Dry-run the advance of `result` against the successor as it stands now.
    fn check_successor_accepts(
        &self,
        source: &GameMatch,
        result: MatchResult,
        round_matches: &[GameMatch],
    ) -> Result<(), ServiceError> {
        let Some(next) = source.next_match_id else {
            return Ok(());
        };
        let destination = self.repo.get_match(next)?;
        let mut decided = source.clone();
        decided.apply(&MatchPatch::finish(result));
        match advance(&decided, &destination, round_matches) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!(
                    "Refused result for match {}: successor {} would not accept it: {}",
                    source.id,
                    destination.id,
                    e
                );
                Err(e.into())
            }
        }
    }

    /// Advisory double-booking warnings for one round.
    pub fn detect_round_conflicts(
        &self,
        tournament_id: TournamentId,
        round: u32,
    ) -> Result<Vec<ConflictWarning>, ServiceError> {
        let matches = self.repo.matches_by_round(tournament_id, round)?;
        let warnings = detect_round_conflicts(&matches);
        if !warnings.is_empty() {
            log::warn!(
                "Tournament {} round {}: {} double-booked entrant(s)",
                tournament_id,
                round,
                warnings.len()
            );
        }
        Ok(warnings)
    }

    pub fn validate_roster(&self, candidate: &RosterCandidate) -> ValidationReport {
        match validate_roster(candidate) {
            Ok(_) => ValidationReport::ok(None),
            Err(e) => {
                log::debug!("Rejected roster: {}", e);
                ValidationReport::rejected(&e)
            }
        }
    }

    /// Build a candidate from registered entrants and validate it.
    ///
    /// Ids are looked up in order, duplicates included, so the validator still sees them.
    pub fn form_roster<S: EntrantSource>(
        &self,
        source: &S,
        tournament_id: TournamentId,
        category: EventCategory,
        member_ids: &[EntrantId],
        name: Option<String>,
    ) -> Result<FormedRoster, ServiceError> {
        let eligible = source.list_eligible_entrants(tournament_id, &category)?;
        let members = member_ids
            .iter()
            .map(|id| {
                eligible
                    .iter()
                    .find(|e| e.id == *id)
                    .map(RosterMember::from)
                    .ok_or(ServiceError::Ineligible(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let candidate = RosterCandidate {
            category,
            members,
            name,
        };
        Ok(validate_roster(&candidate)?)
    }

    fn write(
        &self,
        current: &GameMatch,
        patch: &MatchPatch,
        cause: UpdateCause,
    ) -> Result<GameMatch, ServiceError> {
        let updated = self
            .repo
            .apply_match_update(current.id, current.version, patch)?;
        self.events.publish(MatchUpdated::of(&updated, cause));
        Ok(updated)
    }
}
