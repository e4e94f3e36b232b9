use crate::error::CampaignError;
use crate::sanitize::{lenient_count, round_to};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Request parameters ─────────────────────────────────────────────────

/// Campaign objective. Drives goal scoring and off-goal damping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Sales,
    LeadGen,
    Growth,
    Awareness,
    Advocacy,
}

impl GoalType {
    pub const ALL: [GoalType; 5] = [
        GoalType::Sales,
        GoalType::LeadGen,
        GoalType::Growth,
        GoalType::Awareness,
        GoalType::Advocacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Sales => "sales",
            GoalType::LeadGen => "lead_gen",
            GoalType::Growth => "growth",
            GoalType::Awareness => "awareness",
            GoalType::Advocacy => "advocacy",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalType::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| CampaignError::UnknownGoal(s.to_string()))
    }
}

/// Named perturbation profile simulating a market condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Baseline,
    GrowthSpike,
    FatigueAlert,
    ConversionDrop,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Baseline,
        Scenario::GrowthSpike,
        Scenario::FatigueAlert,
        Scenario::ConversionDrop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Baseline => "baseline",
            Scenario::GrowthSpike => "growth_spike",
            Scenario::FatigueAlert => "fatigue_alert",
            Scenario::ConversionDrop => "conversion_drop",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.as_str() == s.trim())
            .ok_or_else(|| CampaignError::UnknownScenario(s.to_string()))
    }
}

/// Whether a metric's "good direction" is up (volumes) or down (costs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Everything that identifies one synthesized snapshot. The round counter is
/// owned by the caller and bumped to force a fresh sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub entity_id: String,
    pub goal: GoalType,
    pub scenario: Scenario,
    pub round: u32,
}

impl SnapshotRequest {
    pub fn new(entity_id: impl Into<String>, goal: GoalType, scenario: Scenario, round: u32) -> Self {
        Self {
            entity_id: entity_id.into(),
            goal,
            scenario,
            round,
        }
    }

    /// Same request under a different scenario.
    pub fn with_scenario(&self, scenario: Scenario) -> Self {
        Self {
            scenario,
            ..self.clone()
        }
    }
}

// ─── Metric snapshot ────────────────────────────────────────────────────

/// Aggregate paid-media metrics for one entity. Ratios are always derived
/// from the primary counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub spend: f64,
    pub impressions: u64,
    pub reach: u64,
    pub clicks: u64,
    /// Click-through rate in percent.
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub frequency: f64,
    pub leads: u64,
    pub purchases: u64,
    pub purchase_value: f64,
    pub roas: Option<f64>,
    pub cost_per_lead: Option<f64>,
    pub cost_per_purchase: Option<f64>,
}

impl MetricSnapshot {
    /// Copy with monetary and ratio fields rounded to 2 decimals, for the
    /// output boundary only.
    pub fn rounded(&self) -> Self {
        Self {
            spend: round_to(self.spend, 2),
            ctr: round_to(self.ctr, 2),
            cpc: round_to(self.cpc, 2),
            cpm: round_to(self.cpm, 2),
            frequency: round_to(self.frequency, 2),
            purchase_value: round_to(self.purchase_value, 2),
            roas: self.roas.map(|v| round_to(v, 2)),
            cost_per_lead: self.cost_per_lead.map(|v| round_to(v, 2)),
            cost_per_purchase: self.cost_per_purchase.map(|v| round_to(v, 2)),
            ..self.clone()
        }
    }
}

// ─── Scores ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub delivery: f64,
    pub efficiency: f64,
    pub goal: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

/// Classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Attention,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Attention
        } else {
            ScoreBand::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub scores: ScoreSet,
    pub band: ScoreBand,
    pub success_points: Vec<String>,
    pub attention_points: Vec<String>,
}

// ─── Time series ────────────────────────────────────────────────────────

/// Bucket size of a synthesized series. Each has a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesGranularity {
    /// One point per weekday.
    Weekday,
    /// One point per month over a year.
    Monthly,
    /// Two weeks of daily points.
    Daily,
    /// One point per recent post.
    Posts,
    /// One point per hour of a day.
    Hourly,
}

impl SeriesGranularity {
    pub const ALL: [SeriesGranularity; 5] = [
        SeriesGranularity::Weekday,
        SeriesGranularity::Monthly,
        SeriesGranularity::Daily,
        SeriesGranularity::Posts,
        SeriesGranularity::Hourly,
    ];

    pub fn point_count(&self) -> usize {
        match self {
            SeriesGranularity::Weekday => 7,
            SeriesGranularity::Monthly => 12,
            SeriesGranularity::Daily => 14,
            SeriesGranularity::Posts => 20,
            SeriesGranularity::Hourly => 24,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesGranularity::Weekday => "weekday",
            SeriesGranularity::Monthly => "monthly",
            SeriesGranularity::Daily => "daily",
            SeriesGranularity::Posts => "posts",
            SeriesGranularity::Hourly => "hourly",
        }
    }
}

impl FromStr for SeriesGranularity {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesGranularity::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| CampaignError::UnknownGranularity(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub index: usize,
    pub label: String,
    pub timestamp: NaiveDateTime,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub leads: u64,
    pub purchases: u64,
    pub ctr: f64,
}

// ─── Audience ───────────────────────────────────────────────────────────

/// Age brackets reported by the social platforms, youngest first.
pub const AGE_BRACKETS: [&str; 7] = ["13-17", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

/// One age bracket of an age × gender distribution, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGenderRow {
    pub range: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub male: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub female: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: f64,
}

/// Raw account-level engagement counters used for audience quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSignals {
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reach: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub interactions: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reactions: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub shares: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub returning_viewers: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unfollows: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceQuality {
    pub score: f64,
    pub label: QualityLabel,
    pub bot_pct: f64,
    pub ghost_pct: f64,
    pub valuable_pct: f64,
}

/// Influencer bracket drives volume, decisor bracket drives conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBrackets {
    pub influencer: Option<String>,
    pub decisor: Option<String>,
    pub mismatch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceReport {
    pub base: Vec<AgeGenderRow>,
    pub engaged: Vec<AgeGenderRow>,
    pub quality: AudienceQuality,
    pub brackets: KeyBrackets,
}

// ─── Posts and publish windows ──────────────────────────────────────────

/// A published item with its engagement counters. `published_at` is local
/// wall-clock time of the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: String,
    pub published_at: NaiveDateTime,
    #[serde(default, deserialize_with = "lenient_count")]
    pub interactions: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reach: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers_gained: f64,
    /// Share of viewers retained past the first seconds, 0–1.
    #[serde(default, deserialize_with = "lenient_count")]
    pub hook_rate: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reactions: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub shares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishWindow {
    /// 0 = Monday … 6 = Sunday.
    pub day: u32,
    pub day_label: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub score: f64,
    pub item_count: usize,
    pub avg_interactions: f64,
    pub avg_reach: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub top_windows: Vec<PublishWindow>,
    pub best_day: u32,
    pub best_day_label: String,
    pub best_hour: u32,
}
