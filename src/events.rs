//! `MatchUpdated` notifications. Readers subscribe instead of refetching everything.

use crate::models::{GameMatch, MatchId, TournamentId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// What caused a match record to change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCause {
    ScoreReported,
    WinnerAdvanced,
    ByeResolved,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchUpdated {
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    /// Version after the write.
    pub version: u64,
    pub cause: UpdateCause,
    pub at: DateTime<Utc>,
}

impl MatchUpdated {
    pub fn of(m: &GameMatch, cause: UpdateCause) -> Self {
        Self {
            match_id: m.id,
            tournament_id: m.tournament_id,
            version: m.version,
            cause,
            at: Utc::now(),
        }
    }
}

/// Fan-out of match notifications. Lagging receivers lose the oldest events.
#[derive(Clone, Debug)]
pub struct MatchEvents {
    tx: broadcast::Sender<MatchUpdated>,
}

impl MatchEvents {
    pub fn new(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchUpdated> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers. Having none is fine.
    pub fn publish(&self, event: MatchUpdated) {
        log::debug!("MatchUpdated {} v{} ({:?})", event.match_id, event.version, event.cause);
        let _ = self.tx.send(event);
    }
}

impl Default for MatchEvents {
    fn default() -> Self {
        Self::new(100)
    }
}
