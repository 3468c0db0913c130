//! Single binary web server exposing the bracket core as a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT. BRACKET_CSV seeds matches at startup; ADVANCE_ATTEMPTS bounds
//! re-planning when an advancement write is stale.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use federation_bracket::{
    load_matches_csv, AdvanceError, BracketService, GameMatch, InMemoryMatches, MatchEvents,
    MatchId, MatchRepository, ReportedScore, RepositoryError, RosterCandidate, ServiceError,
    TournamentId, ValidationReport, DEFAULT_MAX_ATTEMPTS,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

type AppState = Data<BracketService<InMemoryMatches>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<usize>,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Path segments: tournament id and round (e.g. /api/tournaments/{id}/rounds/{round}/conflicts)
#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round: u32,
}

/// Map a service error to a status: user input is 400, operator-attention states are 409.
fn error_response(e: ServiceError) -> HttpResponse {
    match &e {
        ServiceError::Score(err) => HttpResponse::BadRequest().json(ValidationReport::rejected(err)),
        ServiceError::Roster(err) => HttpResponse::BadRequest().json(ValidationReport::rejected(err)),
        ServiceError::Repository(RepositoryError::NotFound(_)) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        ServiceError::Advance(AdvanceError::SlotConflict { .. })
        | ServiceError::Repository(RepositoryError::StaleWrite { .. })
        | ServiceError::Contended(..) => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() }))
        }
        ServiceError::Repository(RepositoryError::Unavailable) => {
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/api/health")]
async fn api_health(state: AppState) -> impl Responder {
    match state.repository().len() {
        Ok(n) => HttpResponse::Ok().json(HealthResponse {
            ok: true,
            service: "federation-bracket",
            matches: Some(n),
        }),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::InternalServerError().json(HealthResponse {
                ok: false,
                service: "federation-bracket",
                matches: None,
            })
        }
    }
}

/// Check a score report without recording it.
#[post("/api/scores/validate")]
async fn api_validate_score(state: AppState, body: Json<ReportedScore>) -> HttpResponse {
    HttpResponse::Ok().json(state.validate_score(&body))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.repository().get_match(path.id) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(e.into()),
    }
}

/// Record a result and advance the winner.
#[post("/api/matches/{id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ReportedScore>,
) -> HttpResponse {
    match state.report_result(path.id, &body) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

/// Re-run advancement for a finished match (idempotent).
#[post("/api/matches/{id}/advance")]
async fn api_advance(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.advance_winner(path.id) {
        Ok(advance) => HttpResponse::Ok().json(advance),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/rounds/{round}/conflicts")]
async fn api_round_conflicts(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    match state.detect_round_conflicts(path.id, path.round) {
        Ok(warnings) => HttpResponse::Ok().json(warnings),
        Err(e) => error_response(e),
    }
}

#[post("/api/rosters/validate")]
async fn api_validate_roster(state: AppState, body: Json<RosterCandidate>) -> HttpResponse {
    HttpResponse::Ok().json(state.validate_roster(&body))
}

struct ServerConfig {
    host: String,
    port: u16,
    bracket_csv: Option<String>,
    advance_attempts: u32,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            bracket_csv: std::env::var("BRACKET_CSV").ok().filter(|p| !p.is_empty()),
            advance_attempts: std::env::var("ADVANCE_ATTEMPTS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

fn load_bracket(config: &ServerConfig) -> std::io::Result<Vec<GameMatch>> {
    let Some(path) = &config.bracket_csv else {
        return Ok(Vec::new());
    };
    let file = std::fs::File::open(path)?;
    load_matches_csv(file).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bracket = load_bracket(&config)?;
    let ids: Vec<MatchId> = bracket.iter().map(|m| m.id).collect();
    let repo = InMemoryMatches::with_matches(bracket);
    let service =
        BracketService::new(repo, MatchEvents::default()).with_max_attempts(config.advance_attempts);
    // Seeded byes advance before the first request.
    service
        .resolve_byes(ids)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let state = Data::new(service);

    // Background task: log every match update
    let mut updates = state.events().subscribe();
    actix_web::rt::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(ev) => log::info!(
                    "Match {} updated to v{} ({:?})",
                    ev.match_id,
                    ev.version,
                    ev.cause
                ),
                Err(RecvError::Lagged(n)) => log::warn!("Update log skipped {} event(s)", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_validate_score)
            .service(api_get_match)
            .service(api_report_result)
            .service(api_advance)
            .service(api_round_conflicts)
            .service(api_validate_roster)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
