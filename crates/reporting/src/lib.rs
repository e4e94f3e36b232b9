//! Campaign analytics derived from real or synthesized data: composite
//! scores and narrative, audience quality, publish-window ranking, and the
//! composed simulation dashboard.

pub mod audience;
pub mod dashboard;
pub mod scoring;
pub mod windows;

pub use audience::model_audience;
pub use dashboard::{build_dashboard, DashboardOptions, SimulatedDashboard};
pub use scoring::score;
pub use windows::{rank_windows, WindowOptions};
