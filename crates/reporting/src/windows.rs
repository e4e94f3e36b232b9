//! Best publish-window ranking over timestamped posts.
//!
//! Posts are bucketed by (weekday, interval of day). Best day and best hour
//! are separate one-dimensional reductions and are reported as they come out,
//! even when they disagree with the top bucket.

use campaign_core::sanitize::{round_to, safe_div, to_non_negative};
use campaign_core::types::{PostRecord, PublishWindow, WindowReport};
use chrono::{Datelike, Timelike};
use std::collections::BTreeMap;
use tracing::debug;

pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowWeights {
    pub interactions: f64,
    pub reach: f64,
    pub followers: f64,
    pub hook_rate: f64,
}

impl Default for WindowWeights {
    fn default() -> Self {
        Self {
            interactions: 0.45,
            reach: 0.25,
            followers: 0.20,
            hook_rate: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    /// Width of a window in hours, clamped to 1..=24.
    pub interval_hours: u32,
    pub top_k: usize,
    pub weights: WindowWeights,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            interval_hours: 3,
            top_k: 3,
            weights: WindowWeights::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct BucketTotals {
    count: usize,
    interactions: f64,
    reach: f64,
    followers: f64,
    hook_rate: f64,
}

impl BucketTotals {
    fn add(&mut self, post: &PostRecord) {
        self.count += 1;
        self.interactions += to_non_negative(post.interactions, 0.0);
        self.reach += to_non_negative(post.reach, 0.0);
        self.followers += to_non_negative(post.followers_gained, 0.0);
        self.hook_rate += to_non_negative(post.hook_rate, 0.0);
    }

    fn mean(&self, total: f64) -> f64 {
        safe_div(total, self.count as f64)
    }
}

/// Index of the largest per-slot average interaction count; 0 when empty.
/// Ties keep the earliest slot.
fn best_slot(totals: &[BucketTotals]) -> u32 {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, t) in totals.iter().enumerate() {
        if t.count == 0 {
            continue;
        }
        let value = t.mean(t.interactions);
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best as u32
}

pub fn rank_windows(items: &[PostRecord], options: &WindowOptions) -> WindowReport {
    let interval = options.interval_hours.clamp(1, 24);

    let mut buckets: BTreeMap<(u32, u32), BucketTotals> = BTreeMap::new();
    let mut by_day = [BucketTotals::default(); 7];
    let mut by_hour = [BucketTotals::default(); 24];

    for post in items {
        let day = post.published_at.weekday().num_days_from_monday();
        let hour = post.published_at.hour();
        buckets.entry((day, hour / interval)).or_default().add(post);
        by_day[day as usize].add(post);
        by_hour[hour as usize].add(post);
    }

    let averages: Vec<((u32, u32), BucketTotals, [f64; 4])> = buckets
        .into_iter()
        .map(|(key, t)| {
            let avg = [
                t.mean(t.interactions),
                t.mean(t.reach),
                t.mean(t.followers),
                t.mean(t.hook_rate),
            ];
            (key, t, avg)
        })
        .collect();

    let mut max = [0.0f64; 4];
    for (_, _, avg) in &averages {
        for (m, v) in max.iter_mut().zip(avg) {
            *m = m.max(*v);
        }
    }

    let w = options.weights;
    let mut windows: Vec<PublishWindow> = averages
        .into_iter()
        .map(|((day, slot), t, avg)| {
            let score = 100.0
                * (w.interactions * safe_div(avg[0], max[0])
                    + w.reach * safe_div(avg[1], max[1])
                    + w.followers * safe_div(avg[2], max[2])
                    + w.hook_rate * safe_div(avg[3], max[3]));
            let start_hour = slot * interval;
            PublishWindow {
                day,
                day_label: DAY_LABELS[day as usize].to_string(),
                start_hour,
                end_hour: (start_hour + interval).min(24),
                score: round_to(score, 2),
                item_count: t.count,
                avg_interactions: round_to(avg[0], 2),
                avg_reach: round_to(avg[1], 2),
            }
        })
        .collect();

    windows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.item_count.cmp(&a.item_count))
            .then_with(|| (a.day, a.start_hour).cmp(&(b.day, b.start_hour)))
    });
    windows.truncate(options.top_k);

    let best_day = best_slot(&by_day);
    let best_hour = best_slot(&by_hour);

    debug!(
        items = items.len(),
        windows = windows.len(),
        best_day,
        best_hour,
        "Ranked publish windows"
    );

    WindowReport {
        top_windows: windows,
        best_day,
        best_day_label: DAY_LABELS[best_day as usize].to_string(),
        best_hour,
    }
}
