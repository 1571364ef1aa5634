//! Error types for the tracker core
//!
//! Errors are classified by recoverability:
//! - Recoverable: rejected input (validation), transient storage failures
//! - NonRecoverable: broken configuration, unusable storage location
//!
//! Corrupt persisted data is deliberately absent from this list: the store
//! treats it as an empty history and never surfaces it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors specific to slot storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A quantity on a day record that strict validation refuses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },

    #[error("{field} must be a finite number")]
    NonFinite { field: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Negative { field, .. } | ValidationError::NonFinite { field } => field,
        }
    }
}

/// Errors loading or writing `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to write config: {0}")]
    Write(String),
}

/// Umbrella error returned by the tracker surface.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

impl TrackerError {
    /// Returns true if the caller can fix the input or simply try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TrackerError::Validation(_) | TrackerError::Extraction(_) => true,
            TrackerError::Store(StoreError::Sqlite(_)) | TrackerError::Store(StoreError::Io { .. }) => {
                true
            }
            TrackerError::Store(_) | TrackerError::Config(_) => false,
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::Validation(_) => "Check the highlighted value; quantities cannot be negative.",
            TrackerError::Extraction(_) => "Enter the values manually or try a different file.",
            TrackerError::Store(StoreError::Io { .. }) => "Check file permissions and disk space.",
            TrackerError::Store(StoreError::Sqlite(_)) => "The database is busy or damaged. Try again.",
            TrackerError::Store(StoreError::Serialize(_)) => "The day record could not be encoded.",
            TrackerError::Config(ConfigError::HomeDirNotFound) => {
                "Set dataDir in ~/.carbontrack/config.json"
            }
            TrackerError::Store(StoreError::Migration(_)) => {
                "Restore the storage backup or remove the database file."
            }
            TrackerError::Config(_) => "Check ~/.carbontrack/config.json is valid JSON.",
        }
    }
}

/// Serializable error representation for the presentation layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Validation,
    Recoverable,
    NonRecoverable,
}

impl From<&TrackerError> for ErrorPayload {
    fn from(err: &TrackerError) -> Self {
        let (error_type, field) = match err {
            TrackerError::Validation(v) => (ErrorType::Validation, Some(v.field().to_string())),
            e if e.is_recoverable() => (ErrorType::Recoverable, None),
            _ => (ErrorType::NonRecoverable, None),
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_recoverable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_payload_carries_field() {
        let err = TrackerError::from(ValidationError::Negative {
            field: "energy.gas".to_string(),
            value: -2.0,
        });
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.error_type, ErrorType::Validation);
        assert_eq!(payload.field.as_deref(), Some("energy.gas"));
        assert!(payload.can_retry);
        assert!(payload.message.contains("energy.gas"));
    }

    #[test]
    fn test_home_dir_is_not_recoverable() {
        let err = TrackerError::from(ConfigError::HomeDirNotFound);
        assert!(!err.is_recoverable());
        assert_eq!(
            err.recovery_suggestion(),
            "Set dataDir in ~/.carbontrack/config.json"
        );
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.error_type, ErrorType::NonRecoverable);
        assert!(payload.field.is_none());
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let err = TrackerError::Extraction("no text layer".to_string());
        let json = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
        assert_eq!(json["errorType"], "recoverable");
        assert_eq!(json["canRetry"], true);
        assert!(json.get("field").is_none());
    }
}
