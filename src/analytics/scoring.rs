//! Scores and comparisons shown on the dashboard and the daily view.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DailyTargets;
use crate::types::{Category, CategoryEmissions};

use super::weekly::DailyTotal;

/// Daily budget the eco-score is measured against unless told otherwise.
pub const DEFAULT_DAILY_TARGET: f64 = 15.0;

const MAX_SCORE: f64 = 100.0;
const MAX_DAILY_PENALTY: f64 = 20.0;
const MAX_DAILY_BONUS: f64 = 5.0;

/// Gauge range as a multiple of the daily total target.
const GAUGE_HEADROOM: f64 = 1.5;
/// Up to this share of the target still counts as "slightly over".
const SLIGHTLY_OVER_LIMIT: f64 = 120.0;

/// Gamified 0-100 score for a run of days.
///
/// Each day adjusts a base of 100 independently: over target costs twice the
/// excess (at most 20), under target earns half the headroom (at most 5).
/// Only the final sum is clamped, so the order of days does not matter.
pub fn eco_score(series: &[DailyTotal], daily_target: f64) -> f64 {
    let score = series.iter().fold(MAX_SCORE, |score, day| {
        if day.total > daily_target {
            score - ((day.total - daily_target) * 2.0).min(MAX_DAILY_PENALTY)
        } else {
            score + ((daily_target - day.total) * 0.5).min(MAX_DAILY_BONUS)
        }
    });
    score.clamp(0.0, MAX_SCORE)
}

// =============================================================================
// Benchmarks
// =============================================================================

/// Reference daily footprints in kg CO₂ per person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    GlobalAverage,
    DevelopedCountry,
    SustainableTarget,
    ParisAgreement,
}

impl Benchmark {
    pub const ALL: [Benchmark; 4] = [
        Benchmark::GlobalAverage,
        Benchmark::DevelopedCountry,
        Benchmark::SustainableTarget,
        Benchmark::ParisAgreement,
    ];

    pub fn value(&self) -> f64 {
        match self {
            Benchmark::GlobalAverage => 4.8,
            Benchmark::DevelopedCountry => 8.2,
            Benchmark::SustainableTarget => 2.3,
            Benchmark::ParisAgreement => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Benchmark::GlobalAverage => "global_average",
            Benchmark::DevelopedCountry => "developed_country",
            Benchmark::SustainableTarget => "sustainable_target",
            Benchmark::ParisAgreement => "paris_agreement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Better,
    Worse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub value: f64,
    /// User total as a whole-number percentage of the benchmark.
    pub percentage: i64,
    pub status: BenchmarkStatus,
}

pub fn benchmark_comparison(user_daily_total: f64) -> BTreeMap<Benchmark, BenchmarkComparison> {
    Benchmark::ALL
        .iter()
        .map(|benchmark| {
            let value = benchmark.value();
            let status = if user_daily_total <= value {
                BenchmarkStatus::Better
            } else {
                BenchmarkStatus::Worse
            };
            let comparison = BenchmarkComparison {
                value,
                percentage: (user_daily_total / value * 100.0).round() as i64,
                status,
            };
            (*benchmark, comparison)
        })
        .collect()
}

// =============================================================================
// Daily target progress
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Within,
    SlightlyOver,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    /// Share of the daily target used, capped at 100 for the progress bar.
    pub percentage: f64,
    /// Fill of the dial, which runs to 150% of target.
    pub gauge_fraction: f64,
    pub status: TargetStatus,
}

pub fn target_progress(total: f64, targets: &DailyTargets) -> TargetProgress {
    let raw = if targets.total > 0.0 {
        total / targets.total * 100.0
    } else if total > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let status = if raw <= 100.0 {
        TargetStatus::Within
    } else if raw <= SLIGHTLY_OVER_LIMIT {
        TargetStatus::SlightlyOver
    } else {
        TargetStatus::Over
    };

    TargetProgress {
        percentage: raw.min(100.0),
        gauge_fraction: (raw / 100.0 / GAUGE_HEADROOM).min(1.0),
        status,
    }
}

// =============================================================================
// Smart tip
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmartTip {
    /// Nothing logged yet for the day.
    StartTracking,
    /// The biggest category is over its own target.
    Reduce { category: Category, message: String },
    OnTrack,
}

impl SmartTip {
    pub fn message(&self) -> &str {
        match self {
            SmartTip::StartTracking => "Start tracking your activities to get personalized insights!",
            SmartTip::Reduce { message, .. } => message,
            SmartTip::OnTrack => "Great job! You're within your daily targets. Keep it up!",
        }
    }
}

fn reduction_tip(category: Category) -> &'static str {
    match category {
        Category::Transport => {
            "Consider using public transport or cycling to reduce transport emissions."
        }
        Category::Food => "Try incorporating more plant-based meals to lower your food footprint.",
        Category::Energy => {
            "Turn off unused appliances and consider energy-efficient alternatives."
        }
        Category::Shopping => "Buy only what you need and choose sustainable products.",
        Category::Waste => "Increase recycling and composting to reduce waste emissions.",
        Category::Other => "Look for ways to make your other activities more sustainable.",
    }
}

/// Pick one tip from the day's highest-emitting category.
///
/// Ties go to the category listed first in [`Category::ALL`].
pub fn smart_tip(emissions: &CategoryEmissions, targets: &DailyTargets) -> SmartTip {
    let (highest, value) = Category::ALL.iter().skip(1).fold(
        (Category::Transport, emissions.transport),
        |(best, best_value), &category| {
            let value = emissions.get(category);
            if value > best_value {
                (category, value)
            } else {
                (best, best_value)
            }
        },
    );

    if value <= 0.0 {
        SmartTip::StartTracking
    } else if value > targets.for_category(highest) {
        SmartTip::Reduce {
            category: highest,
            message: reduction_tip(highest).to_string(),
        }
    } else {
        SmartTip::OnTrack
    }
}
