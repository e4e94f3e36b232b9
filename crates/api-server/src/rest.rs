//! REST API handlers for the simulation and analytics endpoints, plus
//! operational probes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use campaign_core::config::SimulationConfig;
use campaign_core::types::{
    AgeGenderRow, AudienceReport, AudienceSignals, GoalType, MetricSnapshot, PostRecord,
    Scenario, ScoreReport, SeriesGranularity, SnapshotRequest, TimeSeriesPoint, WindowReport,
};
use campaign_core::CampaignError;
use campaign_reporting::{
    build_dashboard, model_audience, rank_windows, score, DashboardOptions, SimulatedDashboard,
    WindowOptions,
};
use campaign_synthesis::{expand, series_start, synthesize, SeriesRequest};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum entity identifier length.
const MAX_ENTITY_ID_LEN: usize = 256;

/// Maximum number of posts accepted by the window ranker.
const MAX_POSTS: usize = 5_000;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub simulation: Arc<SimulationConfig>,
    pub node_id: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(node_id: impl Into<String>, simulation: SimulationConfig) -> Self {
        Self {
            simulation: Arc::new(simulation),
            node_id: node_id.into(),
            start_time: Instant::now(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Query string shared by the simulation endpoints. Goal and scenario fall
/// back to the configured defaults. Every field is taken as raw text so that
/// malformed values are reported through [`ErrorResponse`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateQuery {
    pub entity_id: Option<String>,
    pub goal: Option<String>,
    pub scenario: Option<String>,
    pub round: Option<String>,
    /// End of the reporting period, e.g. `2024-06-01T00:00:00`; defaults to
    /// today's midnight (UTC).
    pub anchor: Option<String>,
    pub granularity: Option<String>,
}

impl SimulateQuery {
    fn snapshot_request(&self, defaults: &SimulationConfig) -> Result<SnapshotRequest, CampaignError> {
        let entity_id = self.entity_id.as_deref().map(str::trim).unwrap_or_default();
        if entity_id.is_empty() {
            return Err(CampaignError::Validation("'entityId' is required".into()));
        }
        if entity_id.len() > MAX_ENTITY_ID_LEN {
            return Err(CampaignError::Validation("'entityId' exceeds maximum length".into()));
        }

        let goal = match &self.goal {
            Some(raw) => raw.parse::<GoalType>()?,
            None => defaults.default_goal,
        };
        let scenario = match &self.scenario {
            Some(raw) => raw.parse::<Scenario>()?,
            None => defaults.default_scenario,
        };
        let round = match &self.round {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|r| *r >= 1)
                .ok_or_else(|| {
                    CampaignError::Validation("'round' must be a positive integer".into())
                })?,
            None => 1,
        };

        Ok(SnapshotRequest::new(entity_id, goal, scenario, round))
    }

    fn anchor(&self) -> Result<NaiveDateTime, CampaignError> {
        match &self.anchor {
            Some(raw) => raw.trim().parse::<NaiveDateTime>().map_err(|e| {
                CampaignError::Validation(format!("'anchor' is not a local date-time: {e}"))
            }),
            None => Ok(Utc::now().date_naive().and_time(NaiveTime::MIN)),
        }
    }
}

fn error_code(err: &CampaignError) -> &'static str {
    match err {
        CampaignError::UnknownGoal(_) => "unknown_goal",
        CampaignError::UnknownScenario(_) => "unknown_scenario",
        CampaignError::UnknownGranularity(_) => "unknown_granularity",
        CampaignError::Validation(_) => "invalid_request",
        CampaignError::Config(_) => "internal_error",
    }
}

fn reject(endpoint: &'static str, err: CampaignError) -> (StatusCode, Json<ErrorResponse>) {
    warn!(endpoint, error = %err, "Request validation failed");
    metrics::counter!("api.validation_errors", "endpoint" => endpoint).increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error_code(&err).to_string(),
            message: err.to_string(),
        }),
    )
}

fn count_request(endpoint: &'static str) {
    metrics::counter!("api.requests", "endpoint" => endpoint).increment(1);
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub request: SnapshotRequest,
    pub snapshot: MetricSnapshot,
    pub report: ScoreReport,
}

/// GET /v1/simulate/snapshot: Synthesized snapshot with its score report.
pub async fn simulate_snapshot(
    State(state): State<AppState>,
    Query(query): Query<SimulateQuery>,
) -> ApiResult<SnapshotResponse> {
    const ENDPOINT: &str = "simulate_snapshot";
    count_request(ENDPOINT);
    let request = query
        .snapshot_request(&state.simulation)
        .map_err(|e| reject(ENDPOINT, e))?;

    let snapshot = synthesize(&request);
    let report = score(&snapshot, request.goal);
    Ok(Json(SnapshotResponse {
        request,
        snapshot: snapshot.rounded(),
        report,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub request: SnapshotRequest,
    pub granularity: SeriesGranularity,
    pub points: Vec<TimeSeriesPoint>,
}

/// GET /v1/simulate/series: Snapshot expanded into a time series.
pub async fn simulate_series(
    State(state): State<AppState>,
    Query(query): Query<SimulateQuery>,
) -> ApiResult<SeriesResponse> {
    const ENDPOINT: &str = "simulate_series";
    count_request(ENDPOINT);
    let request = query
        .snapshot_request(&state.simulation)
        .map_err(|e| reject(ENDPOINT, e))?;
    let granularity = match &query.granularity {
        Some(raw) => raw
            .parse::<SeriesGranularity>()
            .map_err(|e| reject(ENDPOINT, e))?,
        None => SeriesGranularity::Daily,
    };

    let anchor = query.anchor().map_err(|e| reject(ENDPOINT, e))?;

    let snapshot = synthesize(&request);
    let start = series_start(granularity, anchor);
    let points = expand(
        &snapshot,
        &SeriesRequest::for_snapshot(&request, granularity, start),
    );
    Ok(Json(SeriesResponse {
        request,
        granularity,
        points,
    }))
}

/// GET /v1/simulate/dashboard: Every panel for one simulated entity.
pub async fn simulate_dashboard(
    State(state): State<AppState>,
    Query(query): Query<SimulateQuery>,
) -> ApiResult<SimulatedDashboard> {
    const ENDPOINT: &str = "simulate_dashboard";
    count_request(ENDPOINT);
    let request = query
        .snapshot_request(&state.simulation)
        .map_err(|e| reject(ENDPOINT, e))?;

    let anchor = query.anchor().map_err(|e| reject(ENDPOINT, e))?;

    let options = DashboardOptions::from_config(&state.simulation, anchor);
    let dashboard = build_dashboard(&request, &options);
    info!(
        entity_id = %request.entity_id,
        final_score = dashboard.report.scores.final_score,
        "Served simulated dashboard"
    );
    Ok(Json(dashboard))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceRequest {
    #[serde(default)]
    pub rows: Vec<AgeGenderRow>,
    #[serde(default)]
    pub signals: AudienceSignals,
}

/// POST /v1/analytics/audience: Audience model over caller-supplied data.
pub async fn analyze_audience(Json(body): Json<AudienceRequest>) -> Json<AudienceReport> {
    count_request("analyze_audience");
    Json(model_audience(&body.rows, &body.signals))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsRequest {
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    pub interval_hours: Option<u32>,
    pub top_k: Option<usize>,
}

impl WindowsRequest {
    fn options(&self, defaults: &SimulationConfig) -> Result<WindowOptions, CampaignError> {
        if self.posts.len() > MAX_POSTS {
            return Err(CampaignError::Validation(format!(
                "at most {MAX_POSTS} posts per request"
            )));
        }
        let interval_hours = self.interval_hours.unwrap_or(defaults.window_interval_hours);
        if interval_hours == 0 || 24 % interval_hours != 0 {
            return Err(CampaignError::Validation(
                "'intervalHours' must divide 24".into(),
            ));
        }
        Ok(WindowOptions {
            interval_hours,
            top_k: self.top_k.unwrap_or(defaults.top_windows),
            ..WindowOptions::default()
        })
    }
}

/// POST /v1/analytics/windows: Best publish windows for a post history.
pub async fn analyze_windows(
    State(state): State<AppState>,
    Json(body): Json<WindowsRequest>,
) -> ApiResult<WindowReport> {
    const ENDPOINT: &str = "analyze_windows";
    count_request(ENDPOINT);
    let options = body
        .options(&state.simulation)
        .map_err(|e| reject(ENDPOINT, e))?;
    Ok(Json(rank_windows(&body.posts, &options)))
}

/// GET /health: Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: Readiness probe. The engine holds no external resources,
/// so the node is ready as soon as it serves.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(goal: Option<&str>, scenario: Option<&str>, round: Option<&str>) -> SimulateQuery {
        SimulateQuery {
            entity_id: Some("camp-42".to_string()),
            goal: goal.map(str::to_string),
            scenario: scenario.map(str::to_string),
            round: round.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let req = query(None, None, None)
            .snapshot_request(&SimulationConfig::default())
            .unwrap();
        assert_eq!(req.goal, GoalType::Sales);
        assert_eq!(req.scenario, Scenario::Baseline);
        assert_eq!(req.round, 1);
    }

    #[test]
    fn test_rejects_bad_values() {
        let defaults = SimulationConfig::default();
        assert!(matches!(
            query(Some("retention"), None, None).snapshot_request(&defaults),
            Err(CampaignError::UnknownGoal(_))
        ));
        assert!(matches!(
            query(None, Some("meltdown"), None).snapshot_request(&defaults),
            Err(CampaignError::UnknownScenario(_))
        ));
        for round in ["0", "-3", "4294967296", "two", ""] {
            assert!(matches!(
                query(None, None, Some(round)).snapshot_request(&defaults),
                Err(CampaignError::Validation(_))
            ));
        }
        let missing_entity = SimulateQuery::default();
        assert!(matches!(
            missing_entity.snapshot_request(&defaults),
            Err(CampaignError::Validation(_))
        ));
    }

    #[test]
    fn test_anchor_parsing() {
        let mut q = query(None, None, Some("3"));
        q.anchor = Some("2024-06-01T12:00:00".to_string());
        assert_eq!(q.anchor().unwrap().to_string(), "2024-06-01 12:00:00");
        q.anchor = Some("yesterday".to_string());
        assert!(matches!(q.anchor(), Err(CampaignError::Validation(_))));
    }

    #[test]
    fn test_window_interval_must_divide_day() {
        let defaults = SimulationConfig::default();
        let body = |interval| WindowsRequest {
            posts: Vec::new(),
            interval_hours: Some(interval),
            top_k: None,
        };
        assert!(body(5).options(&defaults).is_err());
        assert!(body(0).options(&defaults).is_err());
        assert_eq!(body(4).options(&defaults).unwrap().interval_hours, 4);
    }
}
