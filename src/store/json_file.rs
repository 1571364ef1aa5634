use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::util::atomic_write_str;

use super::SlotBackend;

/// One `<slot>.json` file per slot inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_slot(slot)))
    }
}

/// Keep slot names usable as file names.
fn sanitize_slot(slot: &str) -> String {
    slot.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl SlotBackend for JsonFileBackend {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StoreError::io(path, e))
    }

    fn write_slot(&mut self, slot: &str, payload: &str) -> Result<(), StoreError> {
        let path = self.slot_path(slot);
        atomic_write_str(&path, payload).map_err(|e| StoreError::io(path, e))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path());
        assert!(backend.read_slot("carbonTrackerData").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut backend = JsonFileBackend::new(dir.path().join("data"));
        backend.write_slot("carbonTrackerData", "{}").expect("write");

        assert!(backend.slot_path("carbonTrackerData").exists());
        assert_eq!(
            backend.read_slot("carbonTrackerData").unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_slot_name_cannot_escape_dir() {
        let backend = JsonFileBackend::new("/tmp/ct");
        let path = backend.slot_path("../etc/passwd");
        assert_eq!(path, PathBuf::from("/tmp/ct/___etc_passwd.json"));
    }
}
