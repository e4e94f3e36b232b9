use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown goal type: {0}")]
    UnknownGoal(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Unknown series granularity: {0}")]
    UnknownGranularity(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for CampaignError {
    fn from(err: config::ConfigError) -> Self {
        CampaignError::Config(err.to_string())
    }
}
