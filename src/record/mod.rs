//! Record types and identity.
//!
//! Records are owned by the store; this crate only builds, reads and submits
//! them. A record without an id has not been persisted yet.

mod account;
mod contact;
mod opportunity;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use account::Account;
pub use contact::Contact;
pub use opportunity::Opportunity;

/// Store-assigned record identifier.
///
/// # Examples
///
/// ```
/// use recordops::RecordId;
///
/// let id = RecordId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a record ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A field value as seen by equality queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Absent / unset field.
    Null,
    /// Free text.
    Text(String),
    /// Reference to another record.
    Id(RecordId),
    /// Decimal number.
    Decimal(Decimal),
    /// Calendar date.
    Date(NaiveDate),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<RecordId> for FieldValue {
    fn from(id: RecordId) -> Self {
        Self::Id(id)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Contract every stored record type implements.
pub trait Record: Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Object label used in logs and errors (e.g. `"Account"`).
    const KIND: &'static str;

    /// Field names accepted by [`Record::field`].
    const FIELDS: &'static [&'static str];

    /// The store-assigned id, if persisted.
    fn id(&self) -> Option<RecordId>;

    /// Assign the store id.
    fn set_id(&mut self, id: RecordId);

    /// Read a field by name. Returns `None` for unknown field names.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Store-side validation rules. Returns the reason on failure.
    fn validate(&self) -> Result<(), String>;
}
