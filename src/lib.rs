//! carbontrack: daily carbon-footprint tracking core.
//!
//! A day's activity inputs live in a [`types::DayRecord`]; the
//! [`engine::Engine`] turns them into per-category kg CO₂; the
//! [`store::RecordStore`] keeps one record per date in a single slot; the
//! [`analytics`] functions derive weekly, monthly and gamified views. A UI host
//! owns one [`state::Tracker`] that ties these together.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod factors;
mod migrations;
pub mod state;
pub mod store;
pub mod types;
pub mod util;

pub use config::{load_config, DailyTargets, StorageKind, TrackerConfig};
pub use engine::{compute_all, Engine, EnginePolicy, FoodPolicy, TransportBreakdown};
pub use error::{ErrorPayload, StoreError, TrackerError, ValidationError};
pub use factors::{EmissionFactorTable, STANDARD_FACTORS};
pub use state::{Dashboard, DaySummary, SharedTracker, Tracker};
pub use store::{DuplicateOutcome, RecordStore, SlotBackend};
pub use types::{CategoryEmissions, DayRecord};

/// Install `env_logger` as the `log` backend, defaulting to `info`.
///
/// `RUST_LOG` overrides the level. Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
