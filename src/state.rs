//! The tracker owned by a UI host for the lifetime of the process.
//!
//! [`Tracker`] holds the one record store, the date being viewed and the
//! configured engine. Every edit goes through [`Tracker::update`], which
//! validates, recomputes and persists the day before returning, so the stored
//! totals never drift from the stored inputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use serde::Serialize;

use crate::analytics::{
    self, Achievement, AchievementProgress, Benchmark, BenchmarkComparison, DailyTotal,
    OffsetOption, Recommendation, SmartTip, TargetProgress,
};
use crate::analytics::offsets::KG_PER_TREE_YEAR;
use crate::config::{open_backend, TrackerConfig};
use crate::engine::{Engine, TransportBreakdown};
use crate::error::TrackerError;
use crate::extraction::{apply_extracted_transport, ActivityExtractor, UploadedFile};
use crate::store::{DuplicateOutcome, RecordStore, SlotBackend};
use crate::types::{AdditionalMode, CategoryEmissions, DayRecord};
use crate::util::shift_days;

/// A tracker shared between threads. All access is serialized by the lock,
/// which keeps recompute and save a single critical section per edit.
pub type SharedTracker = Arc<Mutex<Tracker>>;

/// Everything the daily view renders for the current date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub emissions: CategoryEmissions,
    pub transport: TransportBreakdown,
    pub progress: TargetProgress,
    pub tip: SmartTip,
}

/// Everything the dashboard renders, relative to the current date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub reference: NaiveDate,
    pub weekly: Vec<DailyTotal>,
    pub monthly_total: f64,
    pub eco_score: f64,
    pub benchmarks: BTreeMap<Benchmark, BenchmarkComparison>,
    pub recommendations: Vec<Recommendation>,
    pub offsets: Vec<OffsetOption>,
    pub achievements: Vec<Achievement>,
    pub progress: AchievementProgress,
}

pub struct Tracker<B: SlotBackend = Box<dyn SlotBackend + Send>> {
    store: RecordStore<B>,
    current_date: NaiveDate,
    config: TrackerConfig,
    engine: Engine,
}

impl Tracker {
    /// Open the backend named in `config`, starting on today's local date.
    pub fn open(config: TrackerConfig) -> Result<Self, TrackerError> {
        let backend = open_backend(&config)?;
        Ok(Self::new(config, backend, Local::now().date_naive()))
    }

    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }
}

impl<B: SlotBackend> Tracker<B> {
    pub fn new(config: TrackerConfig, backend: B, today: NaiveDate) -> Self {
        let store = RecordStore::open(backend, config.slot_name.clone());
        let engine = Engine::with_policy(config.engine_policy());
        Self {
            store,
            current_date: today,
            config,
            engine,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn set_current_date(&mut self, date: NaiveDate) {
        log::debug!("Viewing {}", date);
        self.current_date = date;
    }

    /// Move the view by `days` (negative goes back) and return the new date.
    pub fn change_date(&mut self, days: i64) -> NaiveDate {
        self.set_current_date(shift_days(self.current_date, days));
        self.current_date
    }

    /// The record for the current date, created empty on first view.
    ///
    /// Emissions are recomputed on access so records written under an older
    /// factor table show current numbers. Nothing is saved.
    pub fn current_record(&mut self) -> &DayRecord {
        let date = self.current_date;
        let engine = self.engine;
        let record = self.store.get(date);
        engine.compute_all(record, date);
        record
    }

    /// Edit the current day, then validate, recompute and save it.
    ///
    /// A mutation that leaves a negative or non-finite quantity is rolled
    /// back and reported as [`TrackerError::Validation`]; nothing is saved.
    /// If the save itself fails the edit is rolled back too, so memory never
    /// holds a day the backend does not.
    pub fn update<F>(&mut self, mutator: F) -> Result<CategoryEmissions, TrackerError>
    where
        F: FnOnce(&mut DayRecord),
    {
        let date = self.current_date;
        let engine = self.engine;

        let record = self.store.get(date);
        let snapshot = record.clone();
        mutator(&mut *record);

        if let Err(e) = record.validate() {
            log::warn!("Rejected edit for {}: {}", date, e);
            *record = snapshot;
            return Err(e.into());
        }

        let emissions = engine.compute_all(record, date);
        if let Err(e) = self.store.save() {
            log::warn!("Edit for {} not saved, rolling back: {}", date, e);
            *self.store.get(date) = snapshot;
            return Err(e.into());
        }
        log::debug!("{} now totals {:.2} kg", date, emissions.total);
        Ok(emissions)
    }

    /// Toggle extra car trips, public transport or flights for the day.
    pub fn set_transport_mode_enabled(
        &mut self,
        mode: AdditionalMode,
        enabled: bool,
    ) -> Result<CategoryEmissions, TrackerError> {
        self.update(|record| record.set_mode_enabled(mode, enabled))
    }

    /// Run `extractor` over uploaded files and apply the result to today's
    /// commute. Returns whether the extracted mode was usable.
    pub fn import_transport(
        &mut self,
        extractor: &dyn ActivityExtractor,
        files: &[UploadedFile],
    ) -> Result<bool, TrackerError> {
        let extracted = extractor.extract_transport(files)?;
        let mut applied = false;
        self.update(|record| applied = apply_extracted_transport(record, &extracted))?;
        Ok(applied)
    }

    /// Copy yesterday's inputs onto the current date.
    ///
    /// [`DuplicateOutcome::NoData`] is returned, and nothing written, when
    /// the previous day has no record.
    pub fn copy_previous_day(&mut self) -> Result<DuplicateOutcome, TrackerError> {
        let target = self.current_date;
        let source = shift_days(target, -1);

        let outcome = self.store.duplicate(source, target);
        if outcome == DuplicateOutcome::Copied {
            let engine = self.engine;
            engine.compute_all(self.store.get(target), target);
            self.store.save()?;
            log::info!("Copied {} onto {}", source, target);
        }
        Ok(outcome)
    }

    pub fn save(&mut self) -> Result<(), TrackerError> {
        self.store.save()?;
        Ok(())
    }

    pub fn day_summary(&mut self) -> DaySummary {
        let date = self.current_date;
        let engine = self.engine;
        let targets = self.config.daily_targets;

        let record = self.current_record();
        let emissions = record.emissions;
        let transport = engine.transport_breakdown(record);

        DaySummary {
            date,
            emissions,
            transport,
            progress: analytics::target_progress(emissions.total, &targets),
            tip: analytics::smart_tip(&emissions, &targets),
        }
    }

    /// Streak ending on the current date and tree-equivalents saved.
    ///
    /// Each tracked day below the total target saves its headroom; one
    /// tree absorbs 22 kg a year. Days with nothing logged are skipped.
    pub fn achievement_progress(&self) -> AchievementProgress {
        let target = self.config.daily_targets.total;
        let saved_kg: f64 = self
            .store
            .records()
            .values()
            .map(|record| record.emissions.total)
            .filter(|total| *total > 0.0)
            .map(|total| (target - total).max(0.0))
            .sum();

        AchievementProgress {
            consecutive_days_under_target: self
                .store
                .consecutive_days_under_target(self.current_date, target),
            total_trees_equivalent: saved_kg / KG_PER_TREE_YEAR,
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        let reference = self.current_date;
        let records = self.store.records();
        let target = self.config.daily_targets.total;

        let weekly = analytics::weekly_series(records, reference);
        let breakdown = analytics::weekly_breakdown(records, reference);
        let monthly_total = analytics::monthly_total(records, reference);
        let today_total = records.get(&reference).map_or(0.0, |r| r.emissions.total);
        let progress = self.achievement_progress();

        Dashboard {
            reference,
            eco_score: analytics::eco_score(&weekly, target),
            weekly,
            monthly_total,
            benchmarks: analytics::benchmark_comparison(today_total),
            recommendations: analytics::recommendations_for_week(&breakdown),
            offsets: analytics::carbon_offset_options(monthly_total),
            achievements: analytics::achievements(&progress),
            progress,
        }
    }
}
