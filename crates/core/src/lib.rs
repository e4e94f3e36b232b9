pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;

pub use config::AppConfig;
pub use error::{CampaignError, CampaignResult};
pub use sanitize::to_finite_number;
pub use types::{GoalType, Polarity, Scenario};
