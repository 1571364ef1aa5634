//! Pulling activity data out of uploaded documents (tickets, receipts).
//!
//! The core only fixes the contract: files go in, structured transport
//! fields come out. Real extractors (OCR, a hosted model) implement
//! [`ActivityExtractor`] outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::types::{CommuteMode, DayRecord};

/// Commute modes an extraction result may set.
const APPLICABLE_MODES: [&str; 4] = ["car", "bus", "train", "metro"];

/// A document as received from the upload widget.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Transport fields read from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTransport {
    /// Kilometres.
    pub distance: f64,
    /// Free text as recognised, e.g. "Train" or "Taxi".
    pub transport_type: String,
}

pub trait ActivityExtractor {
    fn extract_transport(&self, files: &[UploadedFile]) -> Result<ExtractedTransport, TrackerError>;
}

/// Copy an extraction result onto the day's commute.
///
/// Only car, bus, train and metro (any case) are applied; anything else
/// leaves the record untouched and returns `false`.
pub fn apply_extracted_transport(record: &mut DayRecord, extracted: &ExtractedTransport) -> bool {
    let mode = extracted.transport_type.trim().to_lowercase();
    if !APPLICABLE_MODES.contains(&mode.as_str()) {
        log::debug!(
            "Extracted transport type '{}' does not map to a commute mode",
            extracted.transport_type
        );
        return false;
    }

    record.transport.commute.distance = extracted.distance;
    record.transport.commute.mode = CommuteMode::from(mode);
    true
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    /// Returns a canned result, or fails when no file was given.
    pub struct FakeExtractor {
        pub result: ExtractedTransport,
    }

    impl FakeExtractor {
        pub fn new(distance: f64, transport_type: &str) -> Self {
            Self {
                result: ExtractedTransport {
                    distance,
                    transport_type: transport_type.to_string(),
                },
            }
        }
    }

    impl ActivityExtractor for FakeExtractor {
        fn extract_transport(
            &self,
            files: &[UploadedFile],
        ) -> Result<ExtractedTransport, TrackerError> {
            if files.is_empty() {
                return Err(TrackerError::Extraction("no files uploaded".to_string()));
            }
            Ok(self.result.clone())
        }
    }

    pub fn ticket() -> UploadedFile {
        UploadedFile {
            name: "ticket.pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::{ticket, FakeExtractor};
    use super::*;
    use crate::types::test_utils::blank_record;

    #[test]
    fn test_applies_known_mode_case_insensitively() {
        let mut record = blank_record();
        let extracted = FakeExtractor::new(23.0, "Train")
            .extract_transport(&[ticket()])
            .unwrap();

        assert!(apply_extracted_transport(&mut record, &extracted));
        assert_eq!(record.transport.commute.distance, 23.0);
        assert_eq!(record.transport.commute.mode, CommuteMode::Train);
    }

    #[test]
    fn test_unmapped_type_leaves_record_alone() {
        let mut record = blank_record();
        record.transport.commute.distance = 4.0;
        let before = record.clone();

        let extracted = ExtractedTransport {
            distance: 40.0,
            transport_type: "Taxi".to_string(),
        };
        assert!(!apply_extracted_transport(&mut record, &extracted));
        assert_eq!(record, before);

        // walking is a commute mode but never comes from a ticket
        let walk = ExtractedTransport {
            distance: 2.0,
            transport_type: "walk".to_string(),
        };
        assert!(!apply_extracted_transport(&mut record, &walk));
    }

    #[test]
    fn test_extractor_failure_is_recoverable() {
        let err = FakeExtractor::new(1.0, "bus")
            .extract_transport(&[])
            .unwrap_err();
        assert!(err.is_recoverable());
    }
}
