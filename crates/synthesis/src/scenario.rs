use campaign_core::types::{Polarity, Scenario};

/// Multiplier a scenario applies to a metric of the given polarity.
pub fn multiplier(scenario: Scenario, polarity: Polarity) -> f64 {
    match (scenario, polarity) {
        (Scenario::Baseline, _) => 1.0,
        (Scenario::GrowthSpike, Polarity::Positive) => 1.35,
        (Scenario::GrowthSpike, Polarity::Negative) => 0.85,
        (Scenario::FatigueAlert, Polarity::Positive) => 0.85,
        (Scenario::FatigueAlert, Polarity::Negative) => 1.35,
        (Scenario::ConversionDrop, Polarity::Positive) => 0.75,
        (Scenario::ConversionDrop, Polarity::Negative) => 1.45,
    }
}

pub fn shift(base: f64, scenario: Scenario, polarity: Polarity) -> f64 {
    base * multiplier(scenario, polarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_identity() {
        assert_eq!(shift(250.0, Scenario::Baseline, Polarity::Positive), 250.0);
        assert_eq!(shift(250.0, Scenario::Baseline, Polarity::Negative), 250.0);
    }

    #[test]
    fn test_multiplier_table() {
        let table = [
            (Scenario::GrowthSpike, 1.35, 0.85),
            (Scenario::FatigueAlert, 0.85, 1.35),
            (Scenario::ConversionDrop, 0.75, 1.45),
        ];
        for (scenario, positive, negative) in table {
            assert_eq!(multiplier(scenario, Polarity::Positive), positive);
            assert_eq!(multiplier(scenario, Polarity::Negative), negative);
        }
    }

    #[test]
    fn test_polarity_moves_costs_opposite_to_volumes() {
        let volume = shift(100.0, Scenario::FatigueAlert, Polarity::Positive);
        let cost = shift(100.0, Scenario::FatigueAlert, Polarity::Negative);
        assert!(volume < 100.0);
        assert!(cost > 100.0);
    }
}
