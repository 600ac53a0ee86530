use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::engine::PoissonModel;
use crate::form::{FormDefaults, MatchForm};
use crate::presenter::MatchReport;

#[derive(Clone)]
pub struct AppState {
    pub model: PoissonModel,
    pub defaults: FormDefaults,
}

/// Build the Axum router for the odds form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/odds", get(odds_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the form page with the configured league averages pre-filled.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_index(&state.defaults))
}

fn render_index(defaults: &FormDefaults) -> String {
    FORM_HTML
        .replace(
            "{{HOME_LEAGUE_AVG}}",
            &format!("{:.2}", defaults.home_league_avg),
        )
        .replace(
            "{{AWAY_LEAGUE_AVG}}",
            &format!("{:.2}", defaults.away_league_avg),
        )
}

/// GET /api/odds?home_goals_for=..&home_matches_played=..
///
/// Unparseable fields, out-of-range statistics and overflowing expected goals
/// all answer 422.
async fn odds_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MatchForm>, QueryRejection>,
) -> Result<Json<MatchReport>, (StatusCode, String)> {
    let Query(form) = query.map_err(|e| unprocessable(e.body_text()))?;
    let input = form
        .validate(state.defaults)
        .map_err(|e| unprocessable(e.to_string()))?;
    let report =
        MatchReport::build(&input, &state.model).map_err(|e| unprocessable(e.to_string()))?;
    debug!(
        "Priced {} vs {} (xG {:.2} / {:.2})",
        report.home_team, report.away_team, report.expected_goals.home, report.expected_goals.away
    );
    Ok(Json(report))
}

fn unprocessable(msg: String) -> (StatusCode, String) {
    warn!("Rejected form input: {}", msg);
    (StatusCode::UNPROCESSABLE_ENTITY, msg)
}

/// GET /api/health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "max_goals": state.model.max_goals,
    }))
}

/// Embedded single-file odds form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Poisson Odds Calculator</title>
<style>
  :root {
    --bg: #f5f5f5;
    --card: #ffffff;
    --border: #dddddd;
    --green: #2e7d32;
    --navy: #1a237e;
    --red: #d32f2f;
    --amber: #ff9800;
    --text: #222222;
    --muted: #777777;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1.2rem 2rem; }
  header h1 { color: var(--green); border-bottom: 2px solid var(--green); padding-bottom: .4rem; font-size: 1.6rem; }
  header p { color: var(--muted); margin-top: .4rem; }
  main { padding: 0 2rem 2rem; display: grid; gap: 1.5rem; max-width: 960px; }
  h2 { color: var(--navy); font-size: 1.15rem; margin-bottom: .6rem; }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  .three-col { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 1rem; }
  @media (max-width: 768px) { .two-col, .three-col { grid-template-columns: 1fr; } }
  label { display: block; font-size: .8rem; color: var(--muted); margin-bottom: .25rem; }
  input { width: 100%; padding: 8px; border-radius: 4px; border: 1px solid var(--border); font-size: .95rem; }
  details { background: var(--card); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
  summary { cursor: pointer; font-weight: 600; }
  details h3 { margin: 1rem 0 .5rem; font-size: .95rem; }
  .result-card { padding: 1.5rem; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); background: var(--card); }
  .result-card h4 { margin-bottom: .6rem; }
  .result-card p { margin: .3rem 0; }
  .highlight { color: var(--red); font-weight: bold; }
  .warning { padding: 1rem; border-radius: 8px; background: rgba(255,152,0,.15); color: #8a5200; }
  .error { padding: 1rem; border-radius: 8px; background: rgba(211,47,47,.12); color: var(--red); }
  .hidden { display: none; }
</style>
</head>
<body>
<header>
  <h1>⚽ Poisson Odds Calculator</h1>
  <p>Calculate match probabilities using Poisson distribution</p>
</header>

<main>
  <form id="match-form" onsubmit="return false;">
    <div class="two-col">
      <div><label for="home_team">Home Team</label><input id="home_team" name="home_team" type="text" placeholder="Enter home team name"></div>
      <div><label for="away_team">Away Team</label><input id="away_team" name="away_team" type="text" placeholder="Enter away team name"></div>
    </div>

    <h2 style="margin-top:1.2rem">League Averages</h2>
    <div class="two-col">
      <div><label for="home_league_avg">Home Team League Avg Goals</label><input id="home_league_avg" name="home_league_avg" type="number" min="0" step="0.01" value="{{HOME_LEAGUE_AVG}}"></div>
      <div><label for="away_league_avg">Away Team League Avg Goals</label><input id="away_league_avg" name="away_league_avg" type="number" min="0" step="0.01" value="{{AWAY_LEAGUE_AVG}}"></div>
    </div>

    <details style="margin-top:1.2rem">
      <summary>Team Statistics (Expand)</summary>
      <h3>Home Team Stats</h3>
      <div class="three-col">
        <div><label for="home_goals_for">Home Goals Scored</label><input id="home_goals_for" name="home_goals_for" type="number" min="0" value="0"></div>
        <div><label for="home_goals_against">Home Goals Conceded</label><input id="home_goals_against" name="home_goals_against" type="number" min="0" value="0"></div>
        <div><label for="home_matches_played">Home Matches Played</label><input id="home_matches_played" name="home_matches_played" type="number" min="0" value="0"></div>
      </div>
      <h3>Away Team Stats</h3>
      <div class="three-col">
        <div><label for="away_goals_for">Away Goals Scored</label><input id="away_goals_for" name="away_goals_for" type="number" min="0" value="0"></div>
        <div><label for="away_goals_against">Away Goals Conceded</label><input id="away_goals_against" name="away_goals_against" type="number" min="0" value="0"></div>
        <div><label for="away_matches_played">Away Matches Played</label><input id="away_matches_played" name="away_matches_played" type="number" min="0" value="0"></div>
      </div>
    </details>
  </form>

  <section>
    <h2>Expected Goals</h2>
    <div class="two-col">
      <div class="result-card">🏠 <strong id="xg-home-name">Home</strong>: <span class="highlight" id="xg-home">0.00</span></div>
      <div class="result-card">✈️ <strong id="xg-away-name">Away</strong>: <span class="highlight" id="xg-away">0.00</span></div>
    </div>
  </section>

  <section id="odds-section" class="hidden">
    <h2>📊 Match Odds</h2>
    <div class="two-col">
      <div class="result-card">
        <h4>1X2 Odds</h4>
        <p>🏠 Home Win: <span class="highlight" id="o-1">–</span></p>
        <p>🤝 Draw: <span class="highlight" id="o-X">–</span></p>
        <p>✈️ Away Win: <span class="highlight" id="o-2">–</span></p>
      </div>
      <div class="result-card">
        <h4>Goal Markets</h4>
        <p>⚽ Over 2.5: <span class="highlight" id="o-over">–</span></p>
        <p>🛡️ Under 2.5: <span class="highlight" id="o-under">–</span></p>
      </div>
    </div>
  </section>

  <div id="warning" class="warning hidden"></div>
  <div id="error" class="error hidden"></div>
</main>

<script>
const FIELDS = [
  'home_team', 'away_team', 'home_league_avg', 'away_league_avg',
  'home_goals_for', 'home_goals_against', 'home_matches_played',
  'away_goals_for', 'away_goals_against', 'away_matches_played',
];

function fmtOdds(v) {
  if (v === 'inf' || v === null || v === undefined) return '∞';
  return Number(v).toFixed(2);
}

function show(id, visible) {
  document.getElementById(id).classList.toggle('hidden', !visible);
}

function buildQuery() {
  const params = new URLSearchParams();
  for (const f of FIELDS) {
    const v = document.getElementById(f).value.trim();
    if (v !== '') params.set(f, v);
  }
  return params.toString();
}

let seq = 0;

async function recompute() {
  const mine = ++seq;
  const r = await fetch('/api/odds?' + buildQuery());
  if (mine !== seq) return;

  if (!r.ok) {
    document.getElementById('error').textContent = await r.text();
    show('error', true);
    show('odds-section', false);
    show('warning', false);
    return;
  }
  show('error', false);

  const report = await r.json();
  document.getElementById('xg-home-name').textContent = report.home_team;
  document.getElementById('xg-away-name').textContent = report.away_team;
  document.getElementById('xg-home').textContent = report.expected_goals.home.toFixed(2);
  document.getElementById('xg-away').textContent = report.expected_goals.away.toFixed(2);

  if (report.odds) {
    document.getElementById('o-1').textContent = fmtOdds(report.odds['1']);
    document.getElementById('o-X').textContent = fmtOdds(report.odds['X']);
    document.getElementById('o-2').textContent = fmtOdds(report.odds['2']);
    document.getElementById('o-over').textContent = fmtOdds(report.odds['Over 2.5']);
    document.getElementById('o-under').textContent = fmtOdds(report.odds['Under 2.5']);
    show('odds-section', true);
    show('warning', false);
  } else {
    document.getElementById('warning').textContent = '⚠️ ' + (report.warning || '');
    show('odds-section', false);
    show('warning', true);
  }
}

document.getElementById('match-form').addEventListener('input', recompute);
recompute();
</script>
</body>
</html>"#;
