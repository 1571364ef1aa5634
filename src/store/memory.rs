use std::collections::HashMap;

use crate::error::StoreError;

use super::SlotBackend;

/// Slots held in process memory. Nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    /// A backend pre-seeded with one slot.
    pub fn with_slot(slot: &str, payload: &str) -> Self {
        let mut backend = Self::default();
        backend.slots.insert(slot.to_string(), payload.to_string());
        backend
    }

    pub fn slot(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl SlotBackend for MemoryBackend {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write_slot(&mut self, slot: &str, payload: &str) -> Result<(), StoreError> {
        self.slots.insert(slot.to_string(), payload.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
