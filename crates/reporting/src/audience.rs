//! Audience modeling: engaged age × gender distribution, audience quality
//! score with bot/ghost/valuable composition, and influencer vs decisor
//! brackets.

use campaign_core::sanitize::{round_to, safe_div, to_non_negative};
use campaign_core::types::{
    AgeGenderRow, AudienceQuality, AudienceReport, AudienceSignals, KeyBrackets, QualityLabel,
    AGE_BRACKETS,
};
use tracing::debug;

/// Relative engagement propensity per bracket, aligned with `AGE_BRACKETS`.
pub const ENGAGEMENT_WEIGHTS: [f64; 7] = [1.25, 1.35, 1.15, 0.95, 0.8, 0.65, 0.5];

/// Relative purchase/decision propensity per bracket.
pub const CONVERSION_WEIGHTS: [f64; 7] = [0.3, 0.7, 1.15, 1.3, 1.2, 1.0, 0.8];

const QUALITY_WEIGHTS: QualityWeights = QualityWeights {
    engagement: 0.34,
    deep_signal: 0.20,
    retention: 0.28,
    churn: 0.18,
};

// Benchmarks at which each normalized signal saturates.
const ENGAGEMENT_RATE_BENCHMARK: f64 = 6.0;
const DEEP_SIGNAL_BENCHMARK: f64 = 0.35;
const RETENTION_BENCHMARK: f64 = 0.5;
const CHURN_CEILING: f64 = 5.0;

// Composition bounds, in tenths of a percent.
const BOT_MIN: i64 = 30;
const BOT_MAX: i64 = 180;
const GHOST_MIN: i64 = 60;
const GHOST_MAX: i64 = 300;
const VALUABLE_FLOOR: i64 = 550;
const TOTAL: i64 = 1000;

#[derive(Debug, Clone, Copy)]
struct QualityWeights {
    engagement: f64,
    deep_signal: f64,
    retention: f64,
    churn: f64,
}

fn engagement_weight(range: &str) -> f64 {
    bracket_index(range).map_or(1.0, |i| ENGAGEMENT_WEIGHTS[i])
}

fn conversion_weight(range: &str) -> f64 {
    bracket_index(range).map_or(1.0, |i| CONVERSION_WEIGHTS[i])
}

fn bracket_index(range: &str) -> Option<usize> {
    AGE_BRACKETS.iter().position(|b| *b == range.trim())
}

/// Coerces rows to non-negative values and rescales totals to 100.
///
/// A row's total is the sum of its genders; when both are missing the
/// reported total is split evenly. An all-zero input is returned as zeros.
pub fn normalize_rows(rows: &[AgeGenderRow]) -> Vec<AgeGenderRow> {
    let cleaned: Vec<(String, f64, f64)> = rows
        .iter()
        .map(|row| {
            let male = to_non_negative(row.male, 0.0);
            let female = to_non_negative(row.female, 0.0);
            if male + female > 0.0 {
                (row.range.clone(), male, female)
            } else {
                let half = to_non_negative(row.total, 0.0) / 2.0;
                (row.range.clone(), half, half)
            }
        })
        .collect();

    let sum: f64 = cleaned.iter().map(|(_, m, f)| m + f).sum();
    let factor = safe_div(100.0, sum);

    cleaned
        .into_iter()
        .map(|(range, male, female)| {
            let male = round_to(male * factor, 2);
            let female = round_to(female * factor, 2);
            AgeGenderRow {
                range,
                male,
                female,
                total: round_to(male + female, 2),
            }
        })
        .collect()
}

/// Reweights a base distribution by per-bracket engagement propensity.
pub fn engaged_distribution(rows: &[AgeGenderRow]) -> Vec<AgeGenderRow> {
    let weighted: Vec<AgeGenderRow> = normalize_rows(rows)
        .into_iter()
        .map(|row| {
            let w = engagement_weight(&row.range);
            AgeGenderRow {
                male: row.male * w,
                female: row.female * w,
                total: row.total * w,
                range: row.range,
            }
        })
        .collect();
    normalize_rows(&weighted)
}

fn label_for(score: f64) -> QualityLabel {
    if score >= 75.0 {
        QualityLabel::Excellent
    } else if score >= 55.0 {
        QualityLabel::Good
    } else if score >= 35.0 {
        QualityLabel::Fair
    } else {
        QualityLabel::Poor
    }
}

/// Quality score and bot/ghost/valuable composition for an account.
///
/// The composition is computed in tenths of a percent so the three shares
/// always sum to exactly 100. When valuable falls under 55%, the deficit is
/// taken 70% from ghost (floor 6%) and 30% from bot (floor 3%).
pub fn audience_quality(signals: &AudienceSignals) -> AudienceQuality {
    let followers = to_non_negative(signals.followers, 0.0);
    let reach = to_non_negative(signals.reach, 0.0);
    let interactions = to_non_negative(signals.interactions, 0.0);
    let reactions = to_non_negative(signals.reactions, 0.0);
    let deep = to_non_negative(signals.comments, 0.0) + to_non_negative(signals.shares, 0.0);
    let returning = to_non_negative(signals.returning_viewers, 0.0);
    let unfollows = to_non_negative(signals.unfollows, 0.0);

    let engagement_rate = safe_div(interactions, reach) * 100.0;
    let churn_rate = safe_div(unfollows, followers) * 100.0;

    let engagement = (engagement_rate / ENGAGEMENT_RATE_BENCHMARK).clamp(0.0, 1.0);
    let deep_signal = (safe_div(deep, reactions) / DEEP_SIGNAL_BENCHMARK).clamp(0.0, 1.0);
    let retention = (safe_div(returning, reach) / RETENTION_BENCHMARK).clamp(0.0, 1.0);
    let churn = (churn_rate / CHURN_CEILING).clamp(0.0, 1.0);

    let w = QUALITY_WEIGHTS;
    let score = round_to(
        100.0
            * (w.engagement * engagement
                + w.deep_signal * deep_signal
                + w.retention * retention
                + w.churn * (1.0 - churn)),
        1,
    )
    .clamp(0.0, 100.0);

    let bot_raw = 3.0 + churn_rate.min(100.0) * 1.6 + (1.0 - engagement) * 5.0;
    let ghost_raw = 6.0 + (1.0 - engagement) * 16.0 + (1.0 - retention) * 8.0;

    let mut bot = ((bot_raw * 10.0).round() as i64).clamp(BOT_MIN, BOT_MAX);
    let mut ghost = ((ghost_raw * 10.0).round() as i64).clamp(GHOST_MIN, GHOST_MAX);
    let valuable = TOTAL - bot - ghost;
    if valuable < VALUABLE_FLOOR {
        let deficit = VALUABLE_FLOOR - valuable;
        let ghost_cut = (deficit * 7 + 9) / 10;
        ghost = (ghost - ghost_cut).max(GHOST_MIN);
        bot = (bot - (deficit - ghost_cut)).max(BOT_MIN);
    }
    let valuable = TOTAL - bot - ghost;

    debug!(score, bot, ghost, valuable, "Computed audience quality");

    AudienceQuality {
        score,
        label: label_for(score),
        bot_pct: bot as f64 / 10.0,
        ghost_pct: ghost as f64 / 10.0,
        valuable_pct: valuable as f64 / 10.0,
    }
}

/// Influencer = bracket with the largest engaged share; decisor = bracket
/// with the largest engaged share × conversion weight. Ties keep the
/// youngest bracket. Empty input has neither.
pub fn key_brackets(engaged: &[AgeGenderRow]) -> KeyBrackets {
    let argmax = |weight: fn(&str) -> f64| -> Option<String> {
        engaged
            .iter()
            .fold(None::<(&AgeGenderRow, f64)>, |best, row| {
                let value = row.total * weight(&row.range);
                match best {
                    Some((_, top)) if value <= top => best,
                    _ => Some((row, value)),
                }
            })
            .map(|(row, _)| row.range.clone())
    };

    let influencer = argmax(|_| 1.0);
    let decisor = argmax(conversion_weight);
    let mismatch = influencer != decisor;

    KeyBrackets {
        influencer,
        decisor,
        mismatch,
    }
}

/// Runs the full audience model over a base distribution and account signals.
pub fn model_audience(rows: &[AgeGenderRow], signals: &AudienceSignals) -> AudienceReport {
    let base = normalize_rows(rows);
    let engaged = engaged_distribution(&base);
    let brackets = key_brackets(&engaged);
    AudienceReport {
        base,
        engaged,
        quality: audience_quality(signals),
        brackets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(range: &str, male: f64, female: f64) -> AgeGenderRow {
        AgeGenderRow {
            range: range.to_string(),
            male,
            female,
            total: male + female,
        }
    }

    fn sample_rows() -> Vec<AgeGenderRow> {
        vec![
            row("13-17", 2.0, 2.0),
            row("18-24", 14.0, 16.0),
            row("25-34", 15.0, 15.0),
            row("35-44", 9.0, 9.0),
            row("45-54", 5.0, 5.0),
            row("55-64", 2.0, 3.0),
            row("65+", 1.0, 2.0),
        ]
    }

    fn assert_composition(q: &AudienceQuality) {
        assert!((q.bot_pct + q.ghost_pct + q.valuable_pct - 100.0).abs() < 1e-9);
        assert!(q.valuable_pct >= 55.0);
        assert!((3.0..=18.0).contains(&q.bot_pct));
        assert!((6.0..=30.0).contains(&q.ghost_pct));
    }

    #[test]
    fn test_engaged_distribution_sums_to_hundred() {
        let engaged = engaged_distribution(&sample_rows());
        let total: f64 = engaged.iter().map(|r| r.total).sum();
        assert!((total - 100.0).abs() < 0.1);
        assert!(engaged.iter().all(|r| r.male >= 0.0 && r.female >= 0.0));
    }

    #[test]
    fn test_engagement_shifts_share_to_young_brackets() {
        let base = normalize_rows(&sample_rows());
        let engaged = engaged_distribution(&sample_rows());
        assert!(engaged[1].total > base[1].total);
        assert!(engaged[6].total < base[6].total);
    }

    #[test]
    fn test_normalize_handles_negative_and_missing_genders() {
        let rows = vec![
            row("18-24", -10.0, 30.0),
            AgeGenderRow {
                range: "25-34".to_string(),
                male: f64::NAN,
                female: 0.0,
                total: 10.0,
            },
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out[0].male, 0.0);
        assert_eq!(out[0].total, 75.0);
        assert_eq!(out[1].male, 12.5);
        assert_eq!(out[1].female, 12.5);
    }

    #[test]
    fn test_all_zero_rows_stay_zero() {
        let out = normalize_rows(&[row("18-24", 0.0, 0.0)]);
        assert_eq!(out[0].total, 0.0);
    }

    #[test]
    fn test_influencer_and_decisor_can_differ() {
        let engaged = engaged_distribution(&sample_rows());
        let brackets = key_brackets(&engaged);
        assert_eq!(brackets.influencer.as_deref(), Some("18-24"));
        assert_eq!(brackets.decisor.as_deref(), Some("25-34"));
        assert!(brackets.mismatch);
    }

    #[test]
    fn test_empty_rows_have_no_brackets() {
        let brackets = key_brackets(&[]);
        assert_eq!(brackets.influencer, None);
        assert_eq!(brackets.decisor, None);
        assert!(!brackets.mismatch);
    }

    #[test]
    fn test_healthy_audience_scores_high() {
        let q = audience_quality(&AudienceSignals {
            followers: 50_000.0,
            reach: 40_000.0,
            interactions: 2_800.0,
            reactions: 2_000.0,
            comments: 500.0,
            shares: 300.0,
            returning_viewers: 20_000.0,
            unfollows: 100.0,
        });
        // engagement 7% -> 1, deep 0.4 -> 1, retention 0.5 -> 1, churn 0.2% -> 0.04
        assert!((q.score - 99.3).abs() < 1e-9);
        assert_eq!(q.label, QualityLabel::Excellent);
        assert_eq!(q.bot_pct, 3.3);
        assert_eq!(q.ghost_pct, 6.0);
        assert!((q.valuable_pct - 90.7).abs() < 1e-9);
        assert_composition(&q);
    }

    #[test]
    fn test_extreme_churn_is_rebalanced() {
        let q = audience_quality(&AudienceSignals {
            followers: 1_000.0,
            reach: 1_000.0,
            interactions: 0.0,
            reactions: 0.0,
            comments: 0.0,
            shares: 0.0,
            returning_viewers: 0.0,
            unfollows: 900.0,
        });
        // bot clamps to 18, ghost to 30: deficit 3 split 2.1 ghost / 0.9 bot.
        assert_eq!(q.ghost_pct, 27.9);
        assert_eq!(q.bot_pct, 17.1);
        assert!((q.valuable_pct - 55.0).abs() < 1e-9);
        assert_eq!(q.label, QualityLabel::Poor);
        assert_composition(&q);
    }

    #[test]
    fn test_composition_invariant_over_signal_grid() {
        for churn in [0.0, 10.0, 200.0, 5_000.0, 1e9] {
            for interactions in [0.0, 50.0, 400.0, 5_000.0] {
                for returning in [0.0, 300.0, 900.0] {
                    let q = audience_quality(&AudienceSignals {
                        followers: 5_000.0,
                        reach: 1_000.0,
                        interactions,
                        reactions: interactions * 0.8,
                        comments: interactions * 0.1,
                        shares: interactions * 0.1,
                        returning_viewers: returning,
                        unfollows: churn,
                    });
                    assert_composition(&q);
                    assert!((0.0..=100.0).contains(&q.score));
                }
            }
        }
    }

    #[test]
    fn test_malformed_signals_do_not_escape() {
        let q = audience_quality(&AudienceSignals {
            followers: f64::NAN,
            reach: -5.0,
            interactions: f64::INFINITY,
            ..Default::default()
        });
        assert!(q.score.is_finite());
        assert_composition(&q);
    }

    #[test]
    fn test_model_audience_composes_parts() {
        let report = model_audience(&sample_rows(), &AudienceSignals::default());
        assert_eq!(report.base.len(), 7);
        assert_eq!(report.engaged.len(), 7);
        assert_eq!(report.brackets.influencer.as_deref(), Some("18-24"));
        assert_composition(&report.quality);
    }
}
