//! Contact: a person record whose parent account is derived from its surname.

use serde::{Deserialize, Serialize};

use super::{FieldValue, Record, RecordId};

/// A person record.
///
/// # Examples
///
/// ```
/// use recordops::Contact;
///
/// let contact = Contact::new("John", "Doe");
/// assert_eq!(contact.derived_account_name(), "Doe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store id, `None` until inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Surname. Required.
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Linked account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<RecordId>,
}

impl Contact {
    /// Field name of [`Contact::first_name`].
    pub const FIRST_NAME: &'static str = "first_name";
    /// Field name of [`Contact::last_name`].
    pub const LAST_NAME: &'static str = "last_name";
    /// Field name of [`Contact::email`].
    pub const EMAIL: &'static str = "email";
    /// Field name of [`Contact::account_id`].
    pub const ACCOUNT_ID: &'static str = "account_id";

    /// Creates an unpersisted, unlinked contact.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            account_id: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The account name this contact belongs under: the surname, verbatim.
    #[must_use]
    pub fn derived_account_name(&self) -> &str {
        &self.last_name
    }
}

impl Record for Contact {
    const KIND: &'static str = "Contact";
    const FIELDS: &'static [&'static str] = &[
        "id",
        Self::FIRST_NAME,
        Self::LAST_NAME,
        Self::EMAIL,
        Self::ACCOUNT_ID,
    ];

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            Self::FIRST_NAME => Some(self.first_name.as_str().into()),
            Self::LAST_NAME => Some(self.last_name.as_str().into()),
            Self::EMAIL => Some(self.email.clone().into()),
            Self::ACCOUNT_ID => Some(self.account_id.into()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.last_name.trim().is_empty() {
            return Err("last_name is required".to_string());
        }
        Ok(())
    }
}
