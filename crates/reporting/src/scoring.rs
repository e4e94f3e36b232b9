//! Composite performance scoring and threshold-driven narrative.

use campaign_core::sanitize::{round_to, to_finite_number};
use campaign_core::types::{GoalType, MetricSnapshot, ScoreBand, ScoreReport, ScoreSet};
use tracing::debug;

const DELIVERY_WEIGHT: f64 = 0.35;
const EFFICIENCY_WEIGHT: f64 = 0.35;
const GOAL_WEIGHT: f64 = 0.30;

/// Maximum narrative entries per list.
pub const MAX_POINTS: usize = 5;

pub const SUCCESS_FALLBACK: &str =
    "No standout strengths yet; keep the campaign running to collect more signal.";
pub const ATTENTION_FALLBACK: &str = "No critical issues detected in this period.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Success,
    Attention,
}

/// One threshold rule. Rules are evaluated in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeRule {
    pub kind: PointKind,
    pub applies: fn(&ScoringInputs) -> bool,
    pub message: &'static str,
}

/// Snapshot fields the scoring formulas read, coerced to finite values.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs {
    pub goal: GoalType,
    pub impressions: f64,
    pub reach: f64,
    pub clicks: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub frequency: f64,
    pub leads: f64,
    pub purchases: f64,
    pub roas: Option<f64>,
    pub cost_per_lead: Option<f64>,
}

impl ScoringInputs {
    pub fn new(snapshot: &MetricSnapshot, goal: GoalType) -> Self {
        let finite = |v: f64| to_finite_number(v, 0.0);
        Self {
            goal,
            impressions: snapshot.impressions as f64,
            reach: snapshot.reach as f64,
            clicks: snapshot.clicks as f64,
            ctr: finite(snapshot.ctr),
            cpc: finite(snapshot.cpc),
            cpm: finite(snapshot.cpm),
            frequency: finite(snapshot.frequency),
            leads: snapshot.leads as f64,
            purchases: snapshot.purchases as f64,
            roas: snapshot.roas.map(finite),
            cost_per_lead: snapshot.cost_per_lead.map(finite),
        }
    }
}

fn strong_ctr(m: &ScoringInputs) -> bool {
    m.ctr >= 1.4
}
fn cheap_clicks(m: &ScoringInputs) -> bool {
    m.clicks > 0.0 && m.cpc <= 1.5
}
fn high_roas(m: &ScoringInputs) -> bool {
    m.roas.is_some_and(|r| r >= 3.0)
}
fn healthy_frequency(m: &ScoringInputs) -> bool {
    m.reach > 0.0 && m.frequency <= 2.5
}
fn cheap_delivery(m: &ScoringInputs) -> bool {
    m.impressions > 0.0 && m.cpm <= 15.0
}
fn strong_purchases(m: &ScoringInputs) -> bool {
    m.goal == GoalType::Sales && m.purchases >= 100.0
}
fn strong_leads(m: &ScoringInputs) -> bool {
    m.goal == GoalType::LeadGen && m.leads >= 300.0
}
fn cheap_leads(m: &ScoringInputs) -> bool {
    m.goal == GoalType::LeadGen && m.cost_per_lead.is_some_and(|c| c <= 15.0)
}
fn high_frequency(m: &ScoringInputs) -> bool {
    m.frequency > 3.5
}
fn weak_ctr(m: &ScoringInputs) -> bool {
    m.impressions > 0.0 && m.ctr < 0.8
}
fn expensive_clicks(m: &ScoringInputs) -> bool {
    m.cpc > 4.0
}
fn expensive_delivery(m: &ScoringInputs) -> bool {
    m.cpm > 70.0
}
fn weak_roas(m: &ScoringInputs) -> bool {
    m.goal == GoalType::Sales && m.roas.is_some_and(|r| r < 1.5)
}
fn expensive_leads(m: &ScoringInputs) -> bool {
    m.goal == GoalType::LeadGen && m.cost_per_lead.is_some_and(|c| c > 45.0)
}
fn no_delivery(m: &ScoringInputs) -> bool {
    m.impressions == 0.0
}

pub const NARRATIVE_RULES: [NarrativeRule; 15] = [
    NarrativeRule {
        kind: PointKind::Success,
        applies: strong_ctr,
        message: "Click-through rate is above the 1.4% benchmark.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: cheap_clicks,
        message: "Cost per click is efficient at or below 1.50.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: high_roas,
        message: "Return on ad spend is at or above 3x.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: healthy_frequency,
        message: "Frequency is healthy; the audience is not saturated.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: cheap_delivery,
        message: "CPM is at or below 15, delivery is inexpensive.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: strong_purchases,
        message: "Purchase volume is strong for a sales objective.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: strong_leads,
        message: "Lead volume is strong for a lead generation objective.",
    },
    NarrativeRule {
        kind: PointKind::Success,
        applies: cheap_leads,
        message: "Cost per lead is at or below 15.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: high_frequency,
        message: "Frequency above 3.5: the audience is fatiguing, refresh creatives.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: weak_ctr,
        message: "Click-through rate below 0.8%: review the hook and creative.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: expensive_clicks,
        message: "Cost per click above 4.00: tighten targeting or bids.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: expensive_delivery,
        message: "CPM above 70: auction pressure is high.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: weak_roas,
        message: "Return on ad spend below 1.5x for a sales objective.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: expensive_leads,
        message: "Cost per lead above 45: the landing page may be underperforming.",
    },
    NarrativeRule {
        kind: PointKind::Attention,
        applies: no_delivery,
        message: "No delivery recorded in this period.",
    },
];

fn clamp_score(value: f64) -> f64 {
    to_finite_number(value, 0.0).clamp(0.0, 100.0)
}

pub fn delivery_score(m: &ScoringInputs) -> f64 {
    let penalty = if m.frequency > 3.6 { 12.0 } else { 0.0 };
    clamp_score(40.0 + m.ctr * 16.0 - penalty)
}

pub fn efficiency_score(m: &ScoringInputs) -> f64 {
    let penalty = if m.cpm > 70.0 { 10.0 } else { 0.0 };
    clamp_score(80.0 - m.cpc * 8.0 - penalty + m.roas.unwrap_or(0.0) * 8.0)
}

pub fn goal_score(m: &ScoringInputs) -> f64 {
    match m.goal {
        GoalType::Sales => {
            clamp_score(20.0 + m.roas.unwrap_or(0.0) * 12.0 + (m.purchases / 10.0).min(30.0))
        }
        GoalType::LeadGen => {
            let cpl_penalty = (m.cost_per_lead.unwrap_or(0.0) * 0.8).min(40.0);
            clamp_score(30.0 + (m.leads / 12.0).min(50.0) - cpl_penalty)
        }
        GoalType::Growth | GoalType::Awareness | GoalType::Advocacy => {
            clamp_score(30.0 + m.ctr * 18.0 + (m.leads / 25.0).min(20.0))
        }
    }
}

/// Weighted composite of the three component scores, rounded to 2 decimals.
pub fn final_score(delivery: f64, efficiency: f64, goal: f64) -> f64 {
    clamp_score(round_to(
        DELIVERY_WEIGHT * delivery + EFFICIENCY_WEIGHT * efficiency + GOAL_WEIGHT * goal,
        2,
    ))
}

/// Fires the built-in narrative rules of one kind.
pub fn narrative(m: &ScoringInputs, kind: PointKind) -> Vec<String> {
    narrative_from(&NARRATIVE_RULES, m, kind)
}

/// Fires `rules` of one kind in table order, capped at [`MAX_POINTS`], with a
/// fallback message when nothing fires.
pub fn narrative_from(rules: &[NarrativeRule], m: &ScoringInputs, kind: PointKind) -> Vec<String> {
    let mut points: Vec<String> = rules
        .iter()
        .filter(|rule| rule.kind == kind && (rule.applies)(m))
        .take(MAX_POINTS)
        .map(|rule| rule.message.to_string())
        .collect();

    if points.is_empty() {
        let fallback = match kind {
            PointKind::Success => SUCCESS_FALLBACK,
            PointKind::Attention => ATTENTION_FALLBACK,
        };
        points.push(fallback.to_string());
    }
    points
}

/// Scores a snapshot against a goal and derives its narrative.
pub fn score(snapshot: &MetricSnapshot, goal: GoalType) -> ScoreReport {
    let inputs = ScoringInputs::new(snapshot, goal);

    let delivery = round_to(delivery_score(&inputs), 2);
    let efficiency = round_to(efficiency_score(&inputs), 2);
    let goal_value = round_to(goal_score(&inputs), 2);
    let final_value = final_score(delivery, efficiency, goal_value);

    debug!(
        goal = %goal,
        delivery,
        efficiency,
        goal_score = goal_value,
        final_score = final_value,
        "Scored snapshot"
    );

    ScoreReport {
        scores: ScoreSet {
            delivery,
            efficiency,
            goal: goal_value,
            final_score: final_value,
        },
        band: ScoreBand::from_score(final_value),
        success_points: narrative(&inputs, PointKind::Success),
        attention_points: narrative(&inputs, PointKind::Attention),
    }
}
