//! Date-keyed day records persisted as one document under one named slot.
//!
//! The whole mapping is serialized to JSON and written to the backend in a
//! single call, so a reader never sees half a save. Where the document lives
//! is up to the [`SlotBackend`]: a JSON file, a SQLite row, or memory.
//!
//! An absent, unreadable or corrupt payload loads as an empty history. A
//! single day that fails to decode is set aside and written back verbatim on
//! the next save, so one bad entry never costs the other days.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::types::DayRecord;
use crate::util::{iso_date, parse_iso_date};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Slot name used by the browser build of the tracker.
pub const DEFAULT_SLOT: &str = "carbonTrackerData";

/// All stored days, oldest first.
pub type Records = BTreeMap<NaiveDate, DayRecord>;

/// Slot entries that could not be read as a dated day, keyed as stored.
pub type Unreadable = BTreeMap<String, Value>;

/// A key-value medium holding serialized documents under string slots.
pub trait SlotBackend {
    /// Read the payload for `slot`, `None` if nothing was ever written.
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError>;

    /// Replace the payload for `slot`. Must not expose partial writes.
    fn write_slot(&mut self, slot: &str, payload: &str) -> Result<(), StoreError>;

    /// Short human-readable location for log lines.
    fn describe(&self) -> String;
}

impl<B: SlotBackend + ?Sized> SlotBackend for Box<B> {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        (**self).read_slot(slot)
    }

    fn write_slot(&mut self, slot: &str, payload: &str) -> Result<(), StoreError> {
        (**self).write_slot(slot, payload)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Result of copying one day onto another.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateOutcome {
    Copied,
    /// The source date has no record; nothing was changed.
    NoData,
}

pub struct RecordStore<B: SlotBackend> {
    backend: B,
    slot: String,
    records: Records,
    unreadable: Unreadable,
}

impl<B: SlotBackend> RecordStore<B> {
    /// Open the store and load whatever the slot currently holds.
    pub fn open(backend: B, slot: impl Into<String>) -> Self {
        let mut store = Self {
            backend,
            slot: slot.into(),
            records: Records::new(),
            unreadable: Unreadable::new(),
        };
        store.reload();
        log::info!(
            "Record store opened at {} ({} days)",
            store.backend.describe(),
            store.records.len()
        );
        store
    }

    /// Read the persisted mapping without touching the in-memory copy.
    ///
    /// Absent, unreadable and malformed payloads all come back empty; days
    /// that fail to decode are left out.
    pub fn load(&self) -> Records {
        self.read_document().0
    }

    fn read_document(&self) -> (Records, Unreadable) {
        let payload = match self.backend.read_slot(&self.slot) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Default::default(),
            Err(e) => {
                log::warn!(
                    "Could not read slot '{}' from {}: {}. Starting empty.",
                    self.slot,
                    self.backend.describe(),
                    e
                );
                return Default::default();
            }
        };

        let days = match serde_json::from_str::<Map<String, Value>>(&payload) {
            Ok(days) => days,
            Err(e) => {
                log::warn!(
                    "Ignoring malformed payload in slot '{}': {}",
                    self.slot,
                    e
                );
                return Default::default();
            }
        };

        let mut records = Records::new();
        let mut unreadable = Unreadable::new();
        for (key, raw) in days {
            let Some(date) = parse_iso_date(&key) else {
                log::warn!("Keeping entry '{}' in slot '{}' aside: not a date", key, self.slot);
                unreadable.insert(key, raw);
                continue;
            };
            match DayRecord::deserialize(&raw) {
                Ok(record) => {
                    records.insert(date, record);
                }
                Err(e) => {
                    log::warn!("Keeping day {} in slot '{}' aside: {}", key, self.slot, e);
                    unreadable.insert(key, raw);
                }
            }
        }
        (records, unreadable)
    }

    /// Discard in-memory changes and re-read the slot.
    pub fn reload(&mut self) {
        let (records, unreadable) = self.read_document();
        self.records = records;
        self.unreadable = unreadable;
    }

    /// Persist the full mapping in one backend write.
    ///
    /// Entries set aside at load time are written back unchanged unless a
    /// record now exists for the same date.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let mut document: Map<String, Value> = self
            .unreadable
            .iter()
            .map(|(key, raw)| (key.clone(), raw.clone()))
            .collect();
        for (date, record) in &self.records {
            document.insert(iso_date(*date), serde_json::to_value(record)?);
        }

        let payload = serde_json::to_string(&document)?;
        self.backend.write_slot(&self.slot, &payload)?;
        log::debug!(
            "Saved {} days to slot '{}' ({} bytes)",
            self.records.len(),
            self.slot,
            payload.len()
        );
        Ok(())
    }

    /// Entries in the slot that could not be decoded, kept for the next save.
    pub fn unreadable(&self) -> &Unreadable {
        &self.unreadable
    }

    /// The record for `date`, created empty on first access.
    pub fn get(&mut self, date: NaiveDate) -> &mut DayRecord {
        self.records.entry(date).or_insert_with(|| {
            log::debug!("Creating empty record for {}", date);
            DayRecord::default()
        })
    }

    /// Peek at a record without creating one.
    pub fn record(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records.get(&date)
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Copy every field of `source` onto `target` with a fresh timestamp.
    ///
    /// Returns [`DuplicateOutcome::NoData`] and leaves `target` alone when
    /// `source` has no record.
    pub fn duplicate(&mut self, source: NaiveDate, target: NaiveDate) -> DuplicateOutcome {
        let Some(original) = self.records.get(&source) else {
            log::info!("No data for {} to copy onto {}", source, target);
            return DuplicateOutcome::NoData;
        };

        let mut copy = original.clone();
        copy.timestamp = Utc::now();
        self.records.insert(target, copy);
        DuplicateOutcome::Copied
    }

    /// Number of days in a row, ending at `reference`, whose total stayed at
    /// or below `target`. A day without a record ends the streak.
    pub fn consecutive_days_under_target(&self, reference: NaiveDate, target: f64) -> u32 {
        let mut streak = 0;
        let mut day = Some(reference);
        while let Some(date) = day {
            match self.records.get(&date) {
                Some(record) if record.emissions.total <= target => streak += 1,
                _ => break,
            }
            day = date.pred_opt();
        }
        streak
    }
}
