//! Simulated campaign dashboard: one request in, every panel out.
//!
//! Composes snapshot synthesis, scoring, series expansion, window ranking and
//! the audience model so a frontend can render a full page without live data.

use crate::audience::model_audience;
use crate::scoring::score;
use crate::windows::{rank_windows, WindowOptions, WindowWeights};
use campaign_core::config::SimulationConfig;
use campaign_core::types::{
    AudienceReport, MetricSnapshot, ScoreReport, SeriesGranularity, SnapshotRequest,
    TimeSeriesPoint, WindowReport,
};
use campaign_synthesis::demographics::{synthesize_demographics, synthesize_signals};
use campaign_synthesis::posts::synthesize_posts;
use campaign_synthesis::{expand, series_start, synthesize, SeriesRequest};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

/// Upper bound on the synthetic feed length; one post covers about two days.
pub const MAX_SYNTHETIC_POSTS: usize = 1_000;

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// End of the reporting period. Series start before it, posts precede it.
    pub anchor: NaiveDateTime,
    pub synthetic_posts: usize,
    pub windows: WindowOptions,
}

impl DashboardOptions {
    pub fn from_config(config: &SimulationConfig, anchor: NaiveDateTime) -> Self {
        Self {
            anchor,
            synthetic_posts: config.synthetic_posts.min(MAX_SYNTHETIC_POSTS),
            windows: WindowOptions {
                interval_hours: config.window_interval_hours,
                top_k: config.top_windows,
                weights: WindowWeights::default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedDashboard {
    pub request: SnapshotRequest,
    pub snapshot: MetricSnapshot,
    pub report: ScoreReport,
    pub daily: Vec<TimeSeriesPoint>,
    pub hourly: Vec<TimeSeriesPoint>,
    pub windows: WindowReport,
    pub audience: AudienceReport,
}

pub fn build_dashboard(request: &SnapshotRequest, options: &DashboardOptions) -> SimulatedDashboard {
    let snapshot = synthesize(request);
    let report = score(&snapshot, request.goal);

    let series = |granularity| {
        let start = series_start(granularity, options.anchor);
        expand(&snapshot, &SeriesRequest::for_snapshot(request, granularity, start))
    };
    let daily = series(SeriesGranularity::Daily);
    let hourly = series(SeriesGranularity::Hourly);

    let posts = synthesize_posts(request, options.anchor, options.synthetic_posts);
    let windows = rank_windows(&posts, &options.windows);

    let audience = model_audience(&synthesize_demographics(request), &synthesize_signals(request));

    info!(
        entity_id = %request.entity_id,
        goal = %request.goal,
        scenario = %request.scenario,
        round = request.round,
        final_score = report.scores.final_score,
        "Built simulated dashboard"
    );

    SimulatedDashboard {
        request: request.clone(),
        snapshot: snapshot.rounded(),
        report,
        daily,
        hourly,
        windows,
        audience,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{GoalType, Scenario};
    use chrono::{Duration, NaiveDate};

    fn options() -> DashboardOptions {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        DashboardOptions::from_config(&SimulationConfig::default(), anchor)
    }

    #[test]
    fn test_dashboard_panels_are_populated() {
        let req = SnapshotRequest::new("acme-spring", GoalType::Sales, Scenario::Baseline, 1);
        let dash = build_dashboard(&req, &options());

        assert_eq!(dash.daily.len(), 14);
        assert_eq!(dash.hourly.len(), 24);
        assert!(dash.windows.top_windows.len() <= 3);
        assert!(!dash.windows.top_windows.is_empty());
        assert_eq!(dash.audience.base.len(), 7);
        assert!(dash.audience.quality.valuable_pct >= 55.0);
        assert_eq!(dash.snapshot, synthesize(&req).rounded());
    }

    #[test]
    fn test_series_end_at_anchor() {
        let opts = options();
        let req = SnapshotRequest::new("acme-spring", GoalType::LeadGen, Scenario::GrowthSpike, 2);
        let dash = build_dashboard(&req, &opts);
        assert!(dash.daily.iter().all(|p| p.timestamp < opts.anchor));
        assert!(dash.hourly.iter().all(|p| p.timestamp < opts.anchor));
        assert!(dash.daily[13].timestamp + Duration::days(1) == opts.anchor);
    }

    #[test]
    fn test_oversized_post_feed_is_clamped() {
        let config = SimulationConfig {
            synthetic_posts: usize::MAX,
            ..SimulationConfig::default()
        };
        let opts = DashboardOptions::from_config(&config, options().anchor);
        assert_eq!(opts.synthetic_posts, MAX_SYNTHETIC_POSTS);

        let req = SnapshotRequest::new("acme-spring", GoalType::Growth, Scenario::Baseline, 1);
        let dash = build_dashboard(&req, &opts);
        let ranked: usize = dash.windows.top_windows.iter().map(|w| w.item_count).sum();
        assert!(ranked > 0 && ranked <= MAX_SYNTHETIC_POSTS);
    }

    #[test]
    fn test_dashboard_is_deterministic() {
        let req = SnapshotRequest::new("acme-spring", GoalType::Awareness, Scenario::FatigueAlert, 3);
        let a = serde_json::to_string(&build_dashboard(&req, &options())).unwrap();
        let b = serde_json::to_string(&build_dashboard(&req, &options())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_matches_standalone_scoring() {
        let req = SnapshotRequest::new("acme-spring", GoalType::Sales, Scenario::ConversionDrop, 1);
        let dash = build_dashboard(&req, &options());
        assert_eq!(dash.report, score(&synthesize(&req), GoalType::Sales));
    }

    #[test]
    fn test_serializes_camel_case() {
        let req = SnapshotRequest::new("acme-spring", GoalType::Growth, Scenario::Baseline, 1);
        let value = serde_json::to_value(build_dashboard(&req, &options())).unwrap();
        assert!(value["windows"]["topWindows"].is_array());
        assert!(value["report"]["scores"]["final"].is_number());
        assert!(value["snapshot"]["costPerLead"].is_number() || value["snapshot"]["costPerLead"].is_null());
    }
}
