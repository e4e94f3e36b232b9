//! Single-shot keyed sampling.
//!
//! Unlike [`SeededRandom`](crate::SeededRandom) nothing advances between
//! calls: a key maps to exactly one value, so metrics sampled in any order
//! stay reproducible.

use crate::hashing::hash_key;
use campaign_core::types::{GoalType, Scenario, SnapshotRequest};

/// Maps `key` to a deterministic value in `[min, max]` with 1/1000 steps.
pub fn sample(key: &str, min: f64, max: f64) -> f64 {
    let unit = f64::from(hash_key(key) % 1000) / 1000.0;
    min + unit * (max - min)
}

/// Builder for `"{id}-{goal}-{scenario}-{round}-{tag}"` sampling keys.
#[derive(Debug, Clone, Copy)]
pub struct SampleKey<'a> {
    entity_id: &'a str,
    goal: GoalType,
    scenario: Scenario,
    round: u32,
}

impl<'a> SampleKey<'a> {
    pub fn new(request: &'a SnapshotRequest) -> Self {
        Self {
            entity_id: &request.entity_id,
            goal: request.goal,
            scenario: request.scenario,
            round: request.round,
        }
    }

    /// The same key with the scenario slot pinned to baseline. Base volumes
    /// are drawn from here so every scenario perturbs the same numbers.
    pub fn baseline(self) -> Self {
        Self {
            scenario: Scenario::Baseline,
            ..self
        }
    }

    pub fn tag(&self, tag: &str) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.entity_id, self.goal, self.scenario, self.round, tag
        )
    }

    pub fn sample(&self, tag: &str, min: f64, max: f64) -> f64 {
        sample(&self.tag(tag), min, max)
    }

    pub fn seed(&self, tag: &str) -> u32 {
        hash_key(&self.tag(tag))
    }
}
