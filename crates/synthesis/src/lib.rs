//! Deterministic metric synthesis: string-keyed seeding, scenario
//! perturbation, snapshot and time-series generation for demo and fallback
//! rendering when no live metrics are available.

pub mod demographics;
pub mod hashing;
pub mod metrics;
pub mod posts;
pub mod prng;
pub mod sampler;
pub mod scenario;
pub mod timeseries;

pub use hashing::hash_key;
pub use metrics::{derive_snapshot, synthesize, PrimaryMetrics};
pub use prng::SeededRandom;
pub use sampler::{sample, SampleKey};
pub use scenario::shift;
pub use timeseries::{expand, series_start, SeriesRequest};
