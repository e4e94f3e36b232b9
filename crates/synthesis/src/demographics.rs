//! Synthetic audience inputs: a base age × gender distribution and the raw
//! engagement counters the audience quality model reads.

use crate::sampler::SampleKey;
use crate::scenario::shift;
use campaign_core::sanitize::round_to;
use campaign_core::types::{AgeGenderRow, AudienceSignals, Polarity, SnapshotRequest, AGE_BRACKETS};

/// Typical share of a social audience per bracket, aligned with `AGE_BRACKETS`.
const BRACKET_PRIOR: [f64; 7] = [4.0, 24.0, 31.0, 20.0, 11.0, 6.0, 4.0];

/// Base distribution for an account. Totals sum to ~100.
pub fn synthesize_demographics(request: &SnapshotRequest) -> Vec<AgeGenderRow> {
    let key = SampleKey::new(request).baseline();

    let weights: Vec<f64> = AGE_BRACKETS
        .iter()
        .zip(BRACKET_PRIOR)
        .map(|(range, prior)| prior * key.sample(&format!("age-{range}"), 0.7, 1.3))
        .collect();
    let weight_sum: f64 = weights.iter().sum();

    AGE_BRACKETS
        .iter()
        .zip(weights)
        .map(|(range, weight)| {
            let total = weight / weight_sum * 100.0;
            let male_share = key.sample(&format!("gender-{range}"), 0.38, 0.62);
            let male = round_to(total * male_share, 2);
            let female = round_to(total - male, 2);
            AgeGenderRow {
                range: (*range).to_string(),
                male,
                female,
                total: round_to(male + female, 2),
            }
        })
        .collect()
}

/// Account-level engagement counters under the requested scenario.
pub fn synthesize_signals(request: &SnapshotRequest) -> AudienceSignals {
    let key = SampleKey::new(request).baseline();
    let scenario = request.scenario;

    let followers = key.sample("followers", 4_000.0, 120_000.0).round();
    let reach = shift(followers * key.sample("reach-rate", 0.4, 2.2), scenario, Polarity::Positive);
    let interactions = shift(
        reach * key.sample("interaction-rate", 0.015, 0.08),
        scenario,
        Polarity::Positive,
    );
    let reactions = interactions * key.sample("reaction-share", 0.68, 0.84);
    let comments = interactions * key.sample("comment-share", 0.06, 0.16);

    AudienceSignals {
        followers,
        reach: reach.round(),
        interactions: interactions.round(),
        reactions: reactions.round(),
        comments: comments.round(),
        shares: (interactions - reactions - comments).max(0.0).round(),
        returning_viewers: shift(
            reach * key.sample("returning-rate", 0.2, 0.6),
            scenario,
            Polarity::Positive,
        )
        .min(reach)
        .round(),
        unfollows: shift(
            followers * key.sample("unfollow-rate", 0.002, 0.03),
            scenario,
            Polarity::Negative,
        )
        .round(),
    }
}
