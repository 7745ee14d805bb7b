//! Error types for recordops.
//!
//! All errors are strongly typed using thiserror, so callers can match on
//! specific conditions.

use thiserror::Error;

use crate::storage::StorageError;

/// Validation errors raised before any store call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Close date overflows the calendar: {months} months after {from}")]
    InvalidCloseDate {
        from: chrono::NaiveDate,
        months: u32,
    },
}

/// Errors loading or validating a [`ServiceConfig`](crate::config::ServiceConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {reason}")]
    Invalid {
        reason: String,
    },
}

/// Top-level error type for recordops.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl RecordError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this is a config error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for recordops operations.
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_empty_name() {
        let msg = format!("{}", ValidationError::EmptyName);
        assert!(msg.contains("cannot be empty"));
    }

    #[test]
    fn test_validation_error_close_date() {
        let err = ValidationError::InvalidCloseDate {
            from: chrono::NaiveDate::MAX,
            months: 3,
        };
        assert!(format!("{err}").contains("3 months"));
    }

    #[test]
    fn test_record_error_from_validation() {
        let err: RecordError = ValidationError::EmptyName.into();
        assert!(err.is_validation());
        assert!(!err.is_storage());
    }

    #[test]
    fn test_record_error_from_storage() {
        let err: RecordError = StorageError::NoRows { kind: "Account" }.into();
        assert!(err.is_storage());
        assert!(format!("{err}").contains("No Account rows"));
    }

    #[test]
    fn test_record_error_from_config() {
        let err: RecordError = ConfigError::Invalid {
            reason: "stage cannot be empty".to_string(),
        }
        .into();
        assert!(err.is_config());
        assert!(format!("{err}").contains("stage cannot be empty"));
    }
}
