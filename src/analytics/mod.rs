//! Read-only views derived from stored day records.
//!
//! Every function here takes its inputs explicitly and returns plain data.
//! Nothing in this module mutates a record or touches storage.

pub mod achievements;
pub mod offsets;
pub mod recommendations;
pub mod scoring;
pub mod weekly;

pub use achievements::{achievements, Achievement, AchievementProgress};
pub use offsets::{carbon_offset_options, OffsetKind, OffsetOption};
pub use recommendations::{recommendations, recommendations_for_week, Recommendation};
pub use scoring::{
    benchmark_comparison, eco_score, smart_tip, target_progress, Benchmark, BenchmarkComparison,
    BenchmarkStatus, SmartTip, TargetProgress, TargetStatus, DEFAULT_DAILY_TARGET,
};
pub use weekly::{monthly_total, weekly_breakdown, weekly_series, DailyBreakdown, DailyTotal};
