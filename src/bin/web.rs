//! Single binary web server: operator console API for live judo bouts.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Rules default to 240s / 10-7-1 points / 3 penalties; override with MATCH_DURATION,
//! IPPON_POINTS, WAZAARI_POINTS, YUKO_POINTS, MAX_PENALTIES, LATE_MUTATIONS.
//! MATCHES_FILE may point at a JSON array of match descriptors to seed the store.

use actix_files::Files;
use actix_web::{
    delete, get, post,
    web::{Bytes, Data, Json, Path, ServiceConfig},
    App, HttpResponse, HttpServer, Responder,
};
use judo_scoreboard_web::{
    ClockState, ClockTicker, Competitor, InMemoryMatchStore, LateMutationPolicy, MatchDescriptor,
    MatchId, MatchSession, ScoreKind, ScoringRules, Side, StoreError, WinMethod,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-match entry: live session, its tick task while the clock runs, last activity time.
struct SessionEntry {
    session: MatchSession,
    ticker: Option<ClockTicker>,
    /// Bumped on every ticker start and cancel; a tick task only acts while it holds the
    /// current value, so a task aborted while waiting on the lock cannot tick.
    ticker_generation: u64,
    last_activity: Instant,
}

impl SessionEntry {
    fn new(session: MatchSession) -> Self {
        Self {
            session,
            ticker: None,
            ticker_generation: 0,
            last_activity: Instant::now(),
        }
    }
}

/// Open sessions by match id. Ticks and operator requests serialize on this lock.
type Sessions = Data<RwLock<HashMap<MatchId, SessionEntry>>>;

type Store = Data<InMemoryMatchStore>;

/// Rules every new session starts from (env-configured).
type BaseRules = Data<ScoringRules>;

/// Inactivity threshold: sessions not touched for this long are closed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NewMatchBody {
    id: Option<MatchId>,
    category: String,
    round: String,
    competitor1: Competitor,
    competitor2: Competitor,
    #[serde(default)]
    tatami: u32,
}

/// Per-session rule overrides; missing fields keep the server defaults.
#[derive(Default, Deserialize)]
struct OpenSessionBody {
    duration: Option<u32>,
    ippon_points: Option<u32>,
    wazaari_points: Option<u32>,
    yuko_points: Option<u32>,
    max_penalties: Option<u32>,
    late_mutations: Option<LateMutationPolicy>,
}

impl OpenSessionBody {
    fn apply_to(&self, base: &ScoringRules) -> ScoringRules {
        ScoringRules {
            duration: self.duration.unwrap_or(base.duration),
            ippon_points: self.ippon_points.unwrap_or(base.ippon_points),
            wazaari_points: self.wazaari_points.unwrap_or(base.wazaari_points),
            yuko_points: self.yuko_points.unwrap_or(base.yuko_points),
            max_penalties: self.max_penalties.unwrap_or(base.max_penalties),
            late_mutations: self.late_mutations.unwrap_or(base.late_mutations),
        }
    }
}

#[derive(Deserialize)]
struct AdjustBody {
    delta_seconds: i64,
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    kind: ScoreKind,
}

#[derive(Deserialize)]
struct PenaltyBody {
    side: Side,
}

#[derive(Deserialize)]
struct WinnerBody {
    side: Side,
    #[serde(default)]
    method: WinMethod,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_json(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

fn no_session() -> HttpResponse {
    HttpResponse::NotFound().json(error_json("No open session for this match"))
}

fn store_error_response(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::MatchNotFound(_) => HttpResponse::NotFound().json(error_json(e)),
        StoreError::Unavailable(_) => HttpResponse::BadGateway().json(error_json(e)),
    }
}

/// One tick for the session under `id`. None once the session is closed or the
/// ticker holding `generation` has been superseded.
fn tick_entry(sessions: &Sessions, id: MatchId, generation: u64) -> Option<ClockState> {
    let mut g = sessions.write().ok()?;
    let entry = g.get_mut(&id)?;
    if entry.ticker_generation != generation {
        return None;
    }
    Some(entry.session.tick())
}

fn spawn_ticker(sessions: Sessions, id: MatchId, generation: u64) -> ClockTicker {
    ClockTicker::drive_with(move || tick_entry(&sessions, id, generation))
}

/// Keep the tick task in line with the clock: one task while running, none otherwise.
fn sync_ticker(entry: &mut SessionEntry, sessions: &Sessions, id: MatchId) {
    if entry.session.clock().is_running() {
        let idle = entry.ticker.as_ref().map_or(true, ClockTicker::is_finished);
        if idle {
            entry.ticker_generation = entry.ticker_generation.wrapping_add(1);
            log::debug!("Starting clock ticker {} for match {}", entry.ticker_generation, id);
            entry.ticker = Some(spawn_ticker(sessions.clone(), id, entry.ticker_generation));
        }
    } else if let Some(ticker) = entry.ticker.take() {
        entry.ticker_generation = entry.ticker_generation.wrapping_add(1);
        log::debug!("Cancelling clock ticker for match {}", id);
        ticker.cancel();
    }
}

/// Run one operator action against an open session and answer with its snapshot.
fn apply<F>(sessions: &Sessions, id: MatchId, op: F) -> HttpResponse
where
    F: FnOnce(&mut MatchSession),
{
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_session(),
    };
    entry.last_activity = Instant::now();
    op(&mut entry.session);
    sync_ticker(entry, sessions, id);
    HttpResponse::Ok().json(entry.session.snapshot())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "judo-scoreboard-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Register a match descriptor with the store (stand-in for the data layer).
#[post("/api/matches")]
async fn api_register_match(store: Store, body: Json<NewMatchBody>) -> HttpResponse {
    let body = body.into_inner();
    let descriptor = MatchDescriptor {
        id: body.id.unwrap_or_else(Uuid::new_v4),
        category: body.category,
        round: body.round,
        competitor_1: body.competitor1,
        competitor_2: body.competitor2,
        tatami: body.tatami,
    };
    log::info!("Registered match {} ({} {})", descriptor.id, descriptor.category, descriptor.round);
    store.insert(descriptor.clone()).await;
    HttpResponse::Ok().json(descriptor)
}

/// Descriptor plus last saved result.
#[get("/api/matches/{id}")]
async fn api_get_match(store: Store, path: Path<MatchPath>) -> HttpResponse {
    match store.get(path.id).await {
        Some(stored) => HttpResponse::Ok().json(stored),
        None => store_error_response(&StoreError::MatchNotFound(path.id)),
    }
}

/// Open a scoring session for a stored match. An empty body keeps the server rules;
/// otherwise it must be a JSON object of rule overrides.
#[post("/api/matches/{id}/session")]
async fn api_open_session(
    sessions: Sessions,
    store: Store,
    base_rules: BaseRules,
    path: Path<MatchPath>,
    body: Bytes,
) -> HttpResponse {
    let id = path.id;
    let overrides = if body.iter().all(u8::is_ascii_whitespace) {
        OpenSessionBody::default()
    } else {
        match serde_json::from_slice::<OpenSessionBody>(&body) {
            Ok(b) => b,
            Err(e) => return HttpResponse::BadRequest().json(error_json(e)),
        }
    };
    let rules = overrides.apply_to(&base_rules);
    let session = match MatchSession::open(store.get_ref(), id, rules).await {
        Ok(s) => s,
        Err(e) => return store_error_response(&e),
    };
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.contains_key(&id) {
        return HttpResponse::Conflict().json(error_json("A session is already open for this match"));
    }
    let snapshot = session.snapshot();
    g.insert(id, SessionEntry::new(session));
    HttpResponse::Ok().json(snapshot)
}

/// Current session state (404 if no session). Touching it refreshes last_activity.
#[get("/api/matches/{id}/session")]
async fn api_get_session(sessions: Sessions, path: Path<MatchPath>) -> HttpResponse {
    apply(&sessions, path.id, |_| {})
}

/// Close the session; its tick task is cancelled with it. Unsaved state is discarded.
#[delete("/api/matches/{id}/session")]
async fn api_close_session(sessions: Sessions, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(entry) => {
            log::info!("Closed session for match {}", path.id);
            HttpResponse::Ok().json(entry.session.snapshot())
        }
        None => no_session(),
    }
}

#[post("/api/matches/{id}/clock/start")]
async fn api_clock_start(sessions: Sessions, path: Path<MatchPath>) -> HttpResponse {
    apply(&sessions, path.id, MatchSession::start)
}

#[post("/api/matches/{id}/clock/pause")]
async fn api_clock_pause(sessions: Sessions, path: Path<MatchPath>) -> HttpResponse {
    apply(&sessions, path.id, MatchSession::pause)
}

#[post("/api/matches/{id}/clock/reset")]
async fn api_clock_reset(sessions: Sessions, path: Path<MatchPath>) -> HttpResponse {
    apply(&sessions, path.id, MatchSession::reset)
}

/// Manual time correction (e.g. +10, -30). Floored at zero; never expires the clock.
#[post("/api/matches/{id}/clock/adjust")]
async fn api_clock_adjust(
    sessions: Sessions,
    path: Path<MatchPath>,
    body: Json<AdjustBody>,
) -> HttpResponse {
    apply(&sessions, path.id, |s| s.adjust(body.delta_seconds))
}

/// Record a score event (ippon ends the bout).
#[post("/api/matches/{id}/score")]
async fn api_add_score(sessions: Sessions, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    apply(&sessions, path.id, |s| {
        s.add_score(body.side, body.kind);
    })
}

#[post("/api/matches/{id}/score/remove")]
async fn api_remove_score(
    sessions: Sessions,
    path: Path<MatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    apply(&sessions, path.id, |s| s.remove_score(body.side, body.kind))
}

/// Add a penalty (reaching the limit disqualifies that side).
#[post("/api/matches/{id}/penalty")]
async fn api_add_penalty(
    sessions: Sessions,
    path: Path<MatchPath>,
    body: Json<PenaltyBody>,
) -> HttpResponse {
    apply(&sessions, path.id, |s| {
        s.add_penalty(body.side);
    })
}

#[post("/api/matches/{id}/penalty/remove")]
async fn api_remove_penalty(
    sessions: Sessions,
    path: Path<MatchPath>,
    body: Json<PenaltyBody>,
) -> HttpResponse {
    apply(&sessions, path.id, |s| s.remove_penalty(body.side))
}

/// Operator decision (defaults to method "decision"). Overrides any earlier winner.
#[post("/api/matches/{id}/winner")]
async fn api_declare_winner(
    sessions: Sessions,
    path: Path<MatchPath>,
    body: Json<WinnerBody>,
) -> HttpResponse {
    apply(&sessions, path.id, |s| {
        s.declare_winner(body.side, body.method);
    })
}

/// Write the current outcome to the store. The session stays open; a failed save can be retried.
#[post("/api/matches/{id}/save")]
async fn api_save(sessions: Sessions, store: Store, path: Path<MatchPath>) -> HttpResponse {
    let session = {
        let mut g = match sessions.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return no_session(),
        };
        entry.last_activity = Instant::now();
        entry.session.clone()
    };
    match session.save(store.get_ref()).await {
        Ok(update) => HttpResponse::Ok().json(update),
        Err(e) => {
            log::warn!("Saving match {} failed: {}", path.id, e);
            store_error_response(&e)
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// Parse an env var, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn rules_from_env() -> ScoringRules {
    let defaults = ScoringRules::default();
    let late_mutations = match std::env::var("LATE_MUTATIONS").ok().as_deref() {
        Some("locked") => LateMutationPolicy::Locked,
        Some("permissive") | None => LateMutationPolicy::Permissive,
        Some(other) => {
            log::warn!("Ignoring invalid LATE_MUTATIONS={:?}", other);
            defaults.late_mutations
        }
    };
    ScoringRules {
        duration: env_or("MATCH_DURATION", defaults.duration),
        ippon_points: env_or("IPPON_POINTS", defaults.ippon_points),
        wazaari_points: env_or("WAZAARI_POINTS", defaults.wazaari_points),
        yuko_points: env_or("YUKO_POINTS", defaults.yuko_points),
        max_penalties: env_or("MAX_PENALTIES", defaults.max_penalties),
        late_mutations,
    }
}

fn load_store() -> std::io::Result<InMemoryMatchStore> {
    let path = match std::env::var("MATCHES_FILE") {
        Ok(p) => p,
        Err(_) => return Ok(InMemoryMatchStore::new()),
    };
    let raw = std::fs::read_to_string(&path)?;
    let descriptors: Vec<MatchDescriptor> = serde_json::from_str(&raw)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    log::info!("Loaded {} match(es) from {}", descriptors.len(), path);
    Ok(InMemoryMatchStore::with_matches(descriptors))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let rules = rules_from_env();
    log::info!(
        "Rules: {}s, ippon {} / waza-ari {} / yuko {}, {} penalties, {:?} after end",
        rules.duration,
        rules.ippon_points,
        rules.wazaari_points,
        rules.yuko_points,
        rules.max_penalties,
        rules.late_mutations
    );
    let base_rules = Data::new(rules);
    let store = Data::new(load_store()?);
    let sessions: Sessions = Data::new(RwLock::new(HashMap::new()));

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| default_static_dir());
    let serve_static = std::path::Path::new(&static_dir).is_dir();
    if !serve_static {
        log::info!("No static directory at {}; serving API only", static_dir);
    }

    // Background task: every 30 minutes, close sessions inactive for 12+ hours
    let sessions_cleanup = sessions.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match sessions_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Closed {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        let app = App::new()
            .app_data(sessions.clone())
            .app_data(store.clone())
            .app_data(base_rules.clone())
            .configure(routes);
        if serve_static {
            app.service(Files::new("/static", static_dir.clone()))
        } else {
            app
        }
    })
    .bind(bind)?
    .run()
    .await
}

/// API routes, shared by the server and the handler tests.
fn routes(cfg: &mut ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_register_match)
        .service(api_get_match)
        .service(api_open_session)
        .service(api_get_session)
        .service(api_close_session)
        .service(api_clock_start)
        .service(api_clock_pause)
        .service(api_clock_reset)
        .service(api_clock_adjust)
        .service(api_add_score)
        .service(api_remove_score)
        .service(api_add_penalty)
        .service(api_remove_penalty)
        .service(api_declare_winner)
        .service(api_save);
}
