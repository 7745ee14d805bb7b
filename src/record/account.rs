//! Account: the parent record, keyed by display name.

use serde::{Deserialize, Serialize};

use super::{FieldValue, Record, RecordId};

/// An organization record.
///
/// `name` acts as the natural key even though the store does not enforce
/// uniqueness.
///
/// # Examples
///
/// ```
/// use recordops::Account;
///
/// let account = Account::new("Acme");
/// assert!(account.id.is_none());
/// assert_eq!(account.name, "Acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store id, `None` until inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Display name.
    pub name: String,

    /// Free-text classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,

    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Account {
    /// Field name of [`Account::name`].
    pub const NAME: &'static str = "name";
    /// Field name of [`Account::account_type`].
    pub const ACCOUNT_TYPE: &'static str = "account_type";
    /// Field name of [`Account::description`].
    pub const DESCRIPTION: &'static str = "description";

    /// Creates an unpersisted account with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            account_type: None,
            description: None,
        }
    }

    /// Sets the classification.
    #[must_use]
    pub fn with_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Record for Account {
    const KIND: &'static str = "Account";
    const FIELDS: &'static [&'static str] =
        &["id", Self::NAME, Self::ACCOUNT_TYPE, Self::DESCRIPTION];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            Self::NAME => Some(self.name.as_str().into()),
            Self::ACCOUNT_TYPE => Some(self.account_type.clone().into()),
            Self::DESCRIPTION => Some(self.description.clone().into()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_fails_validation() {
        assert!(Account::new("  ").validate().is_err());
        assert!(Account::new("Acme").validate().is_ok());
    }

    #[test]
    fn field_lookup() {
        let account = Account::new("Acme").with_type("Customer");
        assert_eq!(account.field(Account::NAME), Some(FieldValue::from("Acme")));
        assert_eq!(
            account.field(Account::ACCOUNT_TYPE),
            Some(FieldValue::from("Customer"))
        );
        assert_eq!(account.field(Account::DESCRIPTION), Some(FieldValue::Null));
        assert_eq!(account.field("phone"), None);
    }
}
