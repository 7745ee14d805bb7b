//! Service configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Note values written into an account's description by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Written when the resolver creates the account.
    pub created: String,
    /// Written when the resolver finds an existing account.
    pub updated: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            created: "New".to_string(),
            updated: "Updated".to_string(),
        }
    }
}

/// Defaults applied to opportunities built by the dedup builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityDefaults {
    /// Initial sales stage.
    pub stage: String,
    /// Initial amount.
    pub amount: Decimal,
    /// Close date offset from today, in calendar months.
    pub close_in_months: u32,
}

impl Default for OpportunityDefaults {
    fn default() -> Self {
        Self {
            stage: "Prospecting".to_string(),
            amount: Decimal::from(10_000),
            close_in_months: 3,
        }
    }
}

/// Configuration for [`RecordService`](crate::service::RecordService).
///
/// # Examples
///
/// ```
/// use recordops::ServiceConfig;
///
/// let config = ServiceConfig::from_toml_str("[markers]\nupdated = \"Touched\"\n").unwrap();
/// assert_eq!(config.markers.updated, "Touched");
/// assert_eq!(config.markers.created, "New");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Resolver note markers.
    pub markers: Markers,
    /// Classification given to accounts created by the single-insert path
    /// when the caller does not pass one.
    pub default_account_type: Option<String>,
    /// Opportunity defaults.
    pub opportunity: OpportunityDefaults,
}

impl ServiceConfig {
    /// Load and validate a TOML config file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Parse` on malformed TOML, `Invalid`
    /// if a value fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// `Parse` on malformed TOML, `Invalid` if a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.markers.created.trim().is_empty() || self.markers.updated.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "markers cannot be empty".into(),
            });
        }
        if self.opportunity.stage.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "opportunity stage cannot be empty".into(),
            });
        }
        if self.opportunity.amount.is_sign_negative() {
            return Err(ConfigError::Invalid {
                reason: format!("opportunity amount must not be negative: {}", self.opportunity.amount),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.opportunity.close_in_months, 3);
        assert_eq!(config.opportunity.amount, Decimal::from(10_000));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            default_account_type = "Customer"

            [opportunity]
            amount = "2500.50"
            close_in_months = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.default_account_type.as_deref(), Some("Customer"));
        assert_eq!(config.opportunity.amount, Decimal::new(250_050, 2));
        assert_eq!(config.opportunity.close_in_months, 6);
        assert_eq!(config.opportunity.stage, "Prospecting");
    }

    #[test]
    fn rejects_blank_marker() {
        let err = ServiceConfig::from_toml_str("[markers]\ncreated = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_negative_amount() {
        let err = ServiceConfig::from_toml_str("[opportunity]\namount = \"-1\"\n").unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ServiceConfig::from_toml_str("[markers\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
