//! Expands an aggregate snapshot into ordered, time-bucketed points.
//!
//! Each point is `aggregate × curve(i) × drift(i) × jitter(i) / n`. The curve
//! and drift are not normalized, so summing the points only approximately
//! gives back the aggregate.

use crate::prng::SeededRandom;
use crate::sampler::SampleKey;
use crate::scenario::multiplier;
use campaign_core::sanitize::{round_to, safe_div};
use campaign_core::types::{
    MetricSnapshot, Polarity, Scenario, SeriesGranularity, SnapshotRequest, TimeSeriesPoint,
};
use chrono::{Datelike, Duration, Months, NaiveDateTime, Timelike};

/// Relative activity per hour of day, midnight first.
pub const HOURLY_CURVE: [f64; 24] = [
    0.35, 0.25, 0.18, 0.15, 0.18, 0.3, 0.55, 0.85, 1.1, 1.2, 1.15, 1.1, 1.25, 1.3, 1.15, 1.05,
    1.1, 1.25, 1.45, 1.65, 1.7, 1.5, 1.05, 0.6,
];

/// Relative activity per weekday, Monday first.
pub const WEEKDAY_CURVE: [f64; 7] = [0.92, 1.04, 1.08, 1.06, 1.02, 0.95, 0.93];

/// Hours between consecutive points of a `Posts` series.
pub const POST_SPACING_HOURS: i64 = 18;

#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub granularity: SeriesGranularity,
    pub scenario: Scenario,
    /// Timestamp of the first point.
    pub anchor: NaiveDateTime,
    /// Seed for per-point jitter.
    pub seed: u32,
}

impl SeriesRequest {
    /// Series for a snapshot request; the jitter seed includes the scenario.
    pub fn for_snapshot(
        request: &SnapshotRequest,
        granularity: SeriesGranularity,
        anchor: NaiveDateTime,
    ) -> Self {
        let seed = SampleKey::new(request).seed(&format!("series-{}", granularity.as_str()));
        Self {
            granularity,
            scenario: request.scenario,
            anchor,
            seed,
        }
    }
}

/// Curve value for the bucket at `index`, whose first instant is `timestamp`.
fn curve_factor(granularity: SeriesGranularity, index: usize, timestamp: NaiveDateTime) -> f64 {
    match granularity {
        SeriesGranularity::Daily => 0.85 + index as f64 / 18.0,
        SeriesGranularity::Hourly => HOURLY_CURVE[timestamp.hour() as usize],
        SeriesGranularity::Weekday => {
            WEEKDAY_CURVE[timestamp.weekday().num_days_from_monday() as usize]
        }
        SeriesGranularity::Monthly => 0.88 + index as f64 / 45.0,
        SeriesGranularity::Posts => 0.8 + (index % 5) as f64 / 10.0,
    }
}

/// Scenario effect ramping across the window, neutral at its midpoint.
fn scenario_drift(scenario: Scenario, index: usize, count: usize) -> f64 {
    if count < 2 {
        return 1.0;
    }
    let progress = index as f64 / (count - 1) as f64;
    1.0 + (multiplier(scenario, Polarity::Positive) - 1.0) * (progress - 0.5)
}

/// First timestamp of a series of `granularity` whose last bucket ends at
/// `end`, so every point falls before it.
pub fn series_start(granularity: SeriesGranularity, end: NaiveDateTime) -> NaiveDateTime {
    let n = granularity.point_count();
    let steps = n as i64;
    match granularity {
        SeriesGranularity::Daily | SeriesGranularity::Weekday => end - Duration::days(steps),
        SeriesGranularity::Hourly => end - Duration::hours(steps),
        SeriesGranularity::Posts => end - Duration::hours(steps * POST_SPACING_HOURS),
        SeriesGranularity::Monthly => end
            .checked_sub_months(Months::new(n as u32))
            .unwrap_or(end - Duration::days(steps * 30)),
    }
}

fn bucket_time(granularity: SeriesGranularity, anchor: NaiveDateTime, index: usize) -> NaiveDateTime {
    let i = index as i64;
    match granularity {
        SeriesGranularity::Daily | SeriesGranularity::Weekday => anchor + Duration::days(i),
        SeriesGranularity::Hourly => anchor + Duration::hours(i),
        SeriesGranularity::Posts => anchor + Duration::hours(i * POST_SPACING_HOURS),
        SeriesGranularity::Monthly => anchor
            .checked_add_months(Months::new(index as u32))
            .unwrap_or(anchor + Duration::days(i * 30)),
    }
}

fn bucket_label(granularity: SeriesGranularity, timestamp: NaiveDateTime, index: usize) -> String {
    match granularity {
        SeriesGranularity::Daily => format!("D{}", index + 1),
        SeriesGranularity::Hourly => format!("{:02}h", timestamp.hour()),
        SeriesGranularity::Weekday => timestamp.format("%a").to_string(),
        SeriesGranularity::Monthly => timestamp.format("%b").to_string(),
        SeriesGranularity::Posts => format!("#{}", index + 1),
    }
}

fn scale(value: u64, factor: f64) -> u64 {
    (value as f64 * factor).round().max(0.0) as u64
}

/// Expands `snapshot` into `granularity.point_count()` points in ascending time.
pub fn expand(snapshot: &MetricSnapshot, request: &SeriesRequest) -> Vec<TimeSeriesPoint> {
    let count = request.granularity.point_count();
    let share = 1.0 / count as f64;
    let mut rng = SeededRandom::new(request.seed);

    (0..count)
        .map(|index| {
            let jitter = rng.range(0.96, 1.04);
            let timestamp = bucket_time(request.granularity, request.anchor, index);
            let factor = curve_factor(request.granularity, index, timestamp)
                * scenario_drift(request.scenario, index, count)
                * jitter
                * share;

            let impressions = scale(snapshot.impressions, factor);
            let clicks = scale(snapshot.clicks, factor).min(impressions);

            TimeSeriesPoint {
                index,
                label: bucket_label(request.granularity, timestamp, index),
                timestamp,
                impressions,
                clicks,
                spend: round_to(snapshot.spend * factor, 2),
                leads: scale(snapshot.leads, factor),
                purchases: scale(snapshot.purchases, factor),
                ctr: round_to(safe_div(clicks as f64, impressions as f64) * 100.0, 2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::synthesize;
    use campaign_core::types::GoalType;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn snapshot_request(scenario: Scenario) -> SnapshotRequest {
        SnapshotRequest::new("camp-series", GoalType::LeadGen, scenario, 1)
    }

    #[test]
    fn test_lengths_per_granularity() {
        let req = snapshot_request(Scenario::Baseline);
        let snap = synthesize(&req);
        for granularity in SeriesGranularity::ALL {
            let points = expand(&snap, &SeriesRequest::for_snapshot(&req, granularity, anchor()));
            assert_eq!(points.len(), granularity.point_count());
        }
    }

    #[test]
    fn test_points_ascend_in_time() {
        let req = snapshot_request(Scenario::Baseline);
        let snap = synthesize(&req);
        for granularity in SeriesGranularity::ALL {
            let points = expand(&snap, &SeriesRequest::for_snapshot(&req, granularity, anchor()));
            assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            assert!(points.iter().enumerate().all(|(i, p)| p.index == i));
        }
    }

    #[test]
    fn test_series_is_deterministic() {
        let req = snapshot_request(Scenario::FatigueAlert);
        let snap = synthesize(&req);
        let series = SeriesRequest::for_snapshot(&req, SeriesGranularity::Daily, anchor());
        assert_eq!(expand(&snap, &series), expand(&snap, &series));
    }

    #[test]
    fn test_daily_sum_only_approximates_aggregate() {
        let req = snapshot_request(Scenario::Baseline);
        let snap = synthesize(&req);
        let points = expand(
            &snap,
            &SeriesRequest::for_snapshot(&req, SeriesGranularity::Daily, anchor()),
        );
        let total: u64 = points.iter().map(|p| p.impressions).sum();
        let ratio = total as f64 / snap.impressions as f64;
        // Daily curve averages ~1.21, jitter ±4%.
        assert!(ratio > 1.0 && ratio < 1.4, "ratio {ratio}");
    }

    #[test]
    fn test_growth_ramps_up_and_fatigue_ramps_down() {
        assert!(scenario_drift(Scenario::GrowthSpike, 13, 14) > scenario_drift(Scenario::GrowthSpike, 0, 14));
        assert!(scenario_drift(Scenario::FatigueAlert, 13, 14) < scenario_drift(Scenario::FatigueAlert, 0, 14));
        assert_eq!(scenario_drift(Scenario::Baseline, 3, 14), 1.0);
    }

    #[test]
    fn test_labels() {
        let req = snapshot_request(Scenario::Baseline);
        let snap = synthesize(&req);
        let weekly = expand(
            &snap,
            &SeriesRequest::for_snapshot(&req, SeriesGranularity::Weekday, anchor()),
        );
        // 2024-03-04 is a Monday.
        assert_eq!(weekly[0].label, "Mon");
        assert_eq!(weekly[6].label, "Sun");

        let hourly = expand(
            &snap,
            &SeriesRequest::for_snapshot(&req, SeriesGranularity::Hourly, anchor()),
        );
        assert_eq!(hourly[0].label, "00h");
        assert_eq!(hourly[23].label, "23h");

        let monthly = expand(
            &snap,
            &SeriesRequest::for_snapshot(&req, SeriesGranularity::Monthly, anchor()),
        );
        assert_eq!(monthly[0].label, "Mar");
        assert_eq!(monthly[11].label, "Feb");
    }

    #[test]
    fn test_weekday_curve_follows_calendar_day() {
        // 2024-03-06 is a Wednesday.
        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 6)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let snap = crate::metrics::derive_snapshot(&crate::metrics::PrimaryMetrics {
            spend: 7_000.0,
            impressions: 7_000_000.0,
            ..Default::default()
        });
        let points = expand(
            &snap,
            &SeriesRequest {
                granularity: SeriesGranularity::Weekday,
                scenario: Scenario::Baseline,
                anchor: wednesday,
                seed: 7,
            },
        );
        assert_eq!(points[0].label, "Wed");
        assert_eq!(points[5].label, "Mon");
        for (point, weekday_index) in points.iter().zip([2usize, 3, 4, 5, 6, 0, 1]) {
            let factor = point.impressions as f64 / 1_000_000.0;
            let curve = WEEKDAY_CURVE[weekday_index];
            assert!(
                factor >= curve * 0.96 - 1e-6 && factor <= curve * 1.04 + 1e-6,
                "{}: factor {factor} outside curve {curve}",
                point.label
            );
        }
    }

    #[test]
    fn test_hourly_curve_follows_clock_hour() {
        let afternoon = anchor() + Duration::hours(15);
        let snap = crate::metrics::derive_snapshot(&crate::metrics::PrimaryMetrics {
            impressions: 24_000_000.0,
            ..Default::default()
        });
        let points = expand(
            &snap,
            &SeriesRequest {
                granularity: SeriesGranularity::Hourly,
                scenario: Scenario::Baseline,
                anchor: afternoon,
                seed: 3,
            },
        );
        assert_eq!(points[0].label, "15h");
        let factor = points[0].impressions as f64 / 1_000_000.0;
        assert!((factor - HOURLY_CURVE[15]).abs() <= HOURLY_CURVE[15] * 0.04 + 1e-6);
    }

    #[test]
    fn test_series_start_keeps_every_point_before_end() {
        let req = snapshot_request(Scenario::Baseline);
        let snap = synthesize(&req);
        for end in [anchor(), anchor() + Duration::days(2) + Duration::hours(13)] {
            for granularity in SeriesGranularity::ALL {
                let start = series_start(granularity, end);
                let points = expand(&snap, &SeriesRequest::for_snapshot(&req, granularity, start));
                assert_eq!(points[0].timestamp, start);
                assert!(
                    points.iter().all(|p| p.timestamp < end),
                    "{granularity:?} runs past {end}"
                );
            }
        }
        let monthly = series_start(SeriesGranularity::Monthly, anchor());
        assert_eq!(monthly.date(), NaiveDate::from_ymd_opt(2023, 3, 4).unwrap());
    }

    #[test]
    fn test_zero_snapshot_yields_zero_points() {
        let snap = crate::metrics::derive_snapshot(&Default::default());
        let points = expand(
            &snap,
            &SeriesRequest {
                granularity: SeriesGranularity::Hourly,
                scenario: Scenario::GrowthSpike,
                anchor: anchor(),
                seed: 1,
            },
        );
        assert!(points.iter().all(|p| p.impressions == 0 && p.ctr == 0.0));
    }
}
