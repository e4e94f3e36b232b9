//! Metric snapshot synthesis.
//!
//! Primary counters are sampled from keys pinned to the baseline scenario,
//! perturbed by the requested scenario, and every ratio is then derived from
//! the counters so the snapshot is internally consistent.

use crate::sampler::SampleKey;
use crate::scenario::shift;
use campaign_core::sanitize::{lenient_count, safe_div, to_non_negative};
use campaign_core::types::{GoalType, MetricSnapshot, Polarity, SnapshotRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Counters a snapshot is derived from. Also the shape a live payload is
/// reduced to before re-deriving its ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetrics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub impressions: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reach: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub clicks: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub purchases: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub purchase_value: f64,
}

/// Builds a snapshot from primary counters. Non-finite or negative inputs
/// become 0, and every ratio with a zero denominator is 0.
pub fn derive_snapshot(primary: &PrimaryMetrics) -> MetricSnapshot {
    let spend = to_non_negative(primary.spend, 0.0);
    let impressions = to_non_negative(primary.impressions, 0.0).round();
    // Reach can never exceed impressions.
    let reach = to_non_negative(primary.reach, 0.0).round().min(impressions);
    let clicks = to_non_negative(primary.clicks, 0.0).round();
    let leads = to_non_negative(primary.leads, 0.0).round();
    let purchases = to_non_negative(primary.purchases, 0.0).round();
    let purchase_value = to_non_negative(primary.purchase_value, 0.0);

    MetricSnapshot {
        spend,
        impressions: impressions as u64,
        reach: reach as u64,
        clicks: clicks as u64,
        ctr: safe_div(clicks, impressions) * 100.0,
        cpc: safe_div(spend, clicks),
        cpm: safe_div(spend, impressions) * 1000.0,
        frequency: safe_div(impressions, reach),
        leads: leads as u64,
        purchases: purchases as u64,
        purchase_value,
        roas: (spend > 0.0).then(|| purchase_value / spend),
        cost_per_lead: (leads > 0.0).then(|| spend / leads),
        cost_per_purchase: (purchases > 0.0).then(|| spend / purchases),
    }
}

/// Samples the primary counters for a request.
pub fn synthesize_primary(request: &SnapshotRequest) -> PrimaryMetrics {
    let key = SampleKey::new(request).baseline();
    let scenario = request.scenario;

    let spend_base = key.sample("spend", 1200.0, 14500.0);
    // Impressions bought per currency unit, i.e. CPM between ~9 and ~26.
    let impressions_per_unit = key.sample("impressions", 38.0, 110.0);
    let click_rate = key.sample("clicks", 0.6, 2.8) / 100.0;
    let reach_ratio = key.sample("reach-ratio", 0.3, 0.72);
    let lead_rate = key.sample("leads", 0.04, 0.14);
    let purchase_rate = key.sample("purchases", 0.01, 0.045);
    let order_value = key.sample("order-value", 25.0, 120.0);
    let off_goal_damping = key.sample("off-goal-damping", 0.2, 0.4);

    let spend = shift(spend_base, scenario, Polarity::Negative);
    let impressions = shift(spend_base * impressions_per_unit, scenario, Polarity::Positive).round();
    let reach = (impressions * shift(reach_ratio, scenario, Polarity::Positive).min(1.0)).round();
    let clicks = (impressions * shift(click_rate, scenario, Polarity::Positive)).round();

    let mut leads = clicks * shift(lead_rate, scenario, Polarity::Positive);
    let mut purchases = clicks * shift(purchase_rate, scenario, Polarity::Positive);
    match request.goal {
        GoalType::Sales => leads *= off_goal_damping,
        GoalType::LeadGen | GoalType::Growth | GoalType::Awareness | GoalType::Advocacy => {
            purchases *= off_goal_damping
        }
    }
    let leads = leads.round();
    let purchases = purchases.round();

    PrimaryMetrics {
        spend,
        impressions,
        reach,
        clicks,
        leads,
        purchases,
        purchase_value: purchases * order_value,
    }
}

/// Synthesizes the full snapshot for one entity, goal, scenario and round.
pub fn synthesize(request: &SnapshotRequest) -> MetricSnapshot {
    let snapshot = derive_snapshot(&synthesize_primary(request));
    debug!(
        entity_id = %request.entity_id,
        goal = %request.goal,
        scenario = %request.scenario,
        round = request.round,
        impressions = snapshot.impressions,
        clicks = snapshot.clicks,
        "Synthesized metric snapshot"
    );
    snapshot
}
