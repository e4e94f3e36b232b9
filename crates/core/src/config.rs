use crate::error::CampaignResult;
use crate::types::{GoalType, Scenario};
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_PULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Defaults applied when a caller leaves simulation parameters out.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_goal")]
    pub default_goal: GoalType,
    #[serde(default = "default_scenario")]
    pub default_scenario: Scenario,
    /// Length of the synthetic post feed used for window ranking.
    #[serde(default = "default_synthetic_posts")]
    pub synthetic_posts: usize,
    #[serde(default = "default_top_windows")]
    pub top_windows: usize,
    /// Width of a publish window in hours. Must divide 24.
    #[serde(default = "default_window_interval_hours")]
    pub window_interval_hours: u32,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_goal() -> GoalType {
    GoalType::Sales
}
fn default_scenario() -> Scenario {
    Scenario::Baseline
}
fn default_synthetic_posts() -> usize {
    20
}
fn default_top_windows() -> usize {
    3
}
fn default_window_interval_hours() -> u32 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_goal: default_goal(),
            default_scenario: default_scenario(),
            synthetic_posts: default_synthetic_posts(),
            top_windows: default_top_windows(),
            window_interval_hours: default_window_interval_hours(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> CampaignResult<Self> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CAMPAIGN_PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_source(source)
    }

    /// Deserialize from an already-built source, filling unset keys with
    /// defaults.
    pub fn from_source(source: config::Config) -> CampaignResult<Self> {
        Ok(source.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CampaignError;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.http_port, 8080);
        assert_eq!(cfg.simulation.synthetic_posts, 20);
        assert_eq!(cfg.simulation.top_windows, 3);
        assert_eq!(cfg.simulation.window_interval_hours, 3);
        assert_eq!(cfg.simulation.default_scenario, Scenario::Baseline);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"simulation": {"default_goal": "lead_gen"}, "api": {"http_port": 9000}}"#,
        )
        .unwrap();
        assert_eq!(cfg.simulation.default_goal, GoalType::LeadGen);
        assert_eq!(cfg.simulation.top_windows, 3);
        assert_eq!(cfg.api.http_port, 9000);
        assert_eq!(cfg.api.host, "0.0.0.0");
        assert_eq!(cfg.node_id, "node-01");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let source = config::Config::builder()
            .set_override("api.http_port", "9100")
            .and_then(|b| b.set_override("simulation.default_scenario", "fatigue_alert"))
            .and_then(|b| b.build())
            .unwrap();
        let cfg = AppConfig::from_source(source).unwrap();
        assert_eq!(cfg.api.http_port, 9100);
        assert_eq!(cfg.simulation.default_scenario, Scenario::FatigueAlert);
        assert_eq!(cfg.simulation.synthetic_posts, 20);
    }

    #[test]
    fn test_bad_value_maps_to_config_error() {
        let source = config::Config::builder()
            .set_override("api.http_port", "not-a-port")
            .and_then(|b| b.build())
            .unwrap();
        let err = AppConfig::from_source(source).unwrap_err();
        assert!(matches!(err, CampaignError::Config(_)), "{err}");
    }
}
