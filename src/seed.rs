//! CSV import of externally generated brackets.
//!
//! Columns: `match_id,tournament_id,round,series_format,slot_a,slot_b,next_match_id,source_match_ids`.
//! Slot cells are empty, `BYE`, `winner:<match uuid>` or an entrant uuid. Sources are `;`-separated.

use crate::models::{EntrantId, GameMatch, MatchId, MatchStatus, Occupant, SeriesFormat, TournamentId};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {message}")]
    Row { line: usize, message: String },
    #[error("match {0} appears more than once")]
    DuplicateMatch(MatchId),
    #[error("match {0} is its own ancestor")]
    Cycle(MatchId),
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    match_id: Uuid,
    tournament_id: TournamentId,
    round: u32,
    series_format: SeriesFormat,
    #[serde(default)]
    slot_a: String,
    #[serde(default)]
    slot_b: String,
    #[serde(default)]
    next_match_id: Option<Uuid>,
    #[serde(default)]
    source_match_ids: String,
}

fn parse_occupant(cell: &str) -> Result<Occupant, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(Occupant::Empty);
    }
    if cell.eq_ignore_ascii_case("bye") {
        return Ok(Occupant::Bye);
    }
    if let Some(rest) = cell.strip_prefix("winner:") {
        let source = rest
            .trim()
            .parse::<MatchId>()
            .map_err(|e| format!("bad placeholder {cell:?}: {e}"))?;
        return Ok(Occupant::WinnerOf { source });
    }
    cell.parse::<EntrantId>()
        .map(Occupant::seeded)
        .map_err(|e| format!("bad entrant {cell:?}: {e}"))
}

fn parse_sources(cell: &str) -> Result<Vec<MatchId>, String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<MatchId>().map_err(|e| format!("bad source {s:?}: {e}")))
        .collect()
}

fn row_to_match(row: SeedRow) -> Result<GameMatch, String> {
    if row.round == 0 {
        return Err("round must be at least 1".to_string());
    }
    let source_match_ids = parse_sources(&row.source_match_ids)?;
    if source_match_ids.len() > 2 {
        return Err(format!("{} sources, at most 2 allowed", source_match_ids.len()));
    }
    if source_match_ids.contains(&row.match_id) || row.next_match_id == Some(row.match_id) {
        return Err("match refers to itself".to_string());
    }
    let slot_a = parse_occupant(&row.slot_a)?;
    let slot_b = parse_occupant(&row.slot_b)?;
    // A fed slot only ever receives what its source advances.
    let fed = [("A", &slot_a), ("B", &slot_b)].into_iter().zip(&source_match_ids);
    for ((side, slot), source) in fed {
        match slot {
            Occupant::Empty => {}
            Occupant::WinnerOf { source: s } if s == source => {}
            other => {
                return Err(format!(
                    "slot {side} is fed by match {source} but is seeded with {other:?}"
                ))
            }
        }
    }
    Ok(GameMatch {
        id: row.match_id,
        tournament_id: row.tournament_id,
        round: row.round,
        series_format: row.series_format,
        slot_a,
        slot_b,
        result: None,
        status: MatchStatus::Scheduled,
        next_match_id: row.next_match_id,
        source_match_ids,
        version: 0,
    })
}

/// Read a bracket. Every match starts `scheduled` at version 0.
pub fn load_matches_csv<R: Read>(reader: R) -> Result<Vec<GameMatch>, SeedError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut matches = Vec::new();
    let mut ids = HashSet::new();

    for (i, row) in rdr.deserialize::<SeedRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let m = row_to_match(row?).map_err(|message| SeedError::Row { line, message })?;
        if !ids.insert(m.id) {
            return Err(SeedError::DuplicateMatch(m.id));
        }
        matches.push(m);
    }

    check_acyclic(&matches)?;
    log::info!("Loaded {} bracket match(es)", matches.len());
    Ok(matches)
}

/// Follow `next_match_id` forward and `source_match_ids` back from every match; meeting the
/// start again is a cycle.
fn check_acyclic(matches: &[GameMatch]) -> Result<(), SeedError> {
    let next: HashMap<MatchId, MatchId> = matches
        .iter()
        .filter_map(|m| m.next_match_id.map(|n| (m.id, n)))
        .collect();
    let sources: HashMap<MatchId, &[MatchId]> = matches
        .iter()
        .map(|m| (m.id, m.source_match_ids.as_slice()))
        .collect();

    for m in matches {
        let mut seen = HashSet::from([m.id]);
        let mut cur = m.id;
        while let Some(&n) = next.get(&cur) {
            if !seen.insert(n) {
                return Err(SeedError::Cycle(n));
            }
            cur = n;
        }

        let mut stack: Vec<MatchId> = m.source_match_ids.clone();
        let mut visited = HashSet::new();
        while let Some(s) = stack.pop() {
            if s == m.id {
                return Err(SeedError::Cycle(m.id));
            }
            if visited.insert(s) {
                if let Some(more) = sources.get(&s) {
                    stack.extend_from_slice(more);
                }
            }
        }
    }
    Ok(())
}
