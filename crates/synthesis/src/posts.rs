//! Synthetic post feed for an account, used when no real publishing
//! history is available to rank windows on.

use crate::prng::SeededRandom;
use crate::sampler::SampleKey;
use crate::scenario::shift;
use crate::timeseries::HOURLY_CURVE;
use campaign_core::types::{Polarity, PostRecord, SnapshotRequest};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::Rng;
use tracing::debug;

/// Generates `count` posts published before `anchor`, oldest first.
pub fn synthesize_posts(
    request: &SnapshotRequest,
    anchor: NaiveDateTime,
    count: usize,
) -> Vec<PostRecord> {
    let key = SampleKey::new(request).baseline();
    let mut rng = SeededRandom::new(key.seed("posts"));
    let scenario = request.scenario;

    let posts: Vec<PostRecord> = (0..count)
        .map(|i| {
            // Two days per post, minus up to one day, keeps the feed ascending.
            let days_back = (count - i) as i64 * 2 - rng.gen_range(0..2i64);
            let hour: u32 = rng.gen_range(6..24);
            let minute: u32 = rng.gen_range(0..60);
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
            let published_at = (anchor.date() - Duration::days(days_back)).and_time(time);

            let reach = shift(rng.range(1800.0, 9500.0), scenario, Polarity::Positive);
            let interaction_rate = rng.range(0.02, 0.07) * HOURLY_CURVE[hour as usize];
            let interactions = (reach * interaction_rate).round();
            let reactions = (interactions * rng.range(0.7, 0.85)).round();
            let comments = (interactions * rng.range(0.05, 0.15)).round();
            let shares = (interactions - reactions - comments).max(0.0);

            PostRecord {
                id: format!("{}-post-{:02}", request.entity_id, i + 1),
                published_at,
                interactions,
                reach: reach.round(),
                followers_gained: (reach * rng.range(0.0005, 0.004)).round(),
                hook_rate: rng.range(0.18, 0.62),
                reactions,
                comments,
                shares,
            }
        })
        .collect();

    debug!(entity_id = %request.entity_id, count = posts.len(), "Synthesized post feed");
    posts
}
