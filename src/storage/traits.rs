//! Abstract storage traits for recordops.
//!
//! The store is an external collaborator. By keeping it behind a trait we
//! enable:
//! - An in-memory backend for tests and embedded use
//! - Adapters for hosted record stores

use thiserror::Error;

use crate::record::{FieldValue, Record, RecordId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind.
        kind: &'static str,
        /// Missing id.
        id: RecordId,
    },

    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A record in the batch was rejected by a validation rule.
    #[error("{kind} failed validation: {reason}")]
    ValidationFailed {
        /// Record kind.
        kind: &'static str,
        /// Rule that failed.
        reason: String,
    },

    /// Query referenced a field the record kind does not have.
    #[error("Unknown field '{field}' on {kind}")]
    UnknownField {
        /// Record kind.
        kind: &'static str,
        /// Offending field name.
        field: String,
    },

    /// An exactly-one lookup matched nothing.
    #[error("No {kind} rows for exactly-one query")]
    NoRows {
        /// Record kind.
        kind: &'static str,
    },

    /// An exactly-one lookup matched several rows.
    #[error("{count} {kind} rows for exactly-one query")]
    TooManyRows {
        /// Record kind.
        kind: &'static str,
        /// Rows matched.
        count: usize,
    },

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// One exact-equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field name, see each record type's field constants.
    pub field: String,
    /// Value the field must equal.
    pub value: FieldValue,
}

/// Conjunction of equality filters with an optional row limit.
///
/// # Examples
///
/// ```
/// use recordops::{Account, Query};
///
/// let q = Query::new().eq(Account::NAME, "Acme").limit(1);
/// assert_eq!(q.filters.len(), 1);
/// assert_eq!(q.limit, Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// All filters must match.
    pub filters: Vec<Filter>,
    /// Maximum rows returned.
    pub limit: Option<usize>,
}

impl Query {
    /// An unfiltered query (matches every record).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if `record` satisfies every filter.
    ///
    /// # Errors
    /// `UnknownField` if a filter names a field `R` does not have.
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool, StorageError> {
        for filter in &self.filters {
            let Some(actual) = record.field(&filter.field) else {
                return Err(StorageError::UnknownField {
                    kind: R::KIND,
                    field: filter.field.clone(),
                });
            };
            if actual != filter.value {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Storage trait for one record kind.
///
/// Every write is all-or-nothing per call: implementations validate the
/// whole batch before applying any record.
pub trait RecordStore<R: Record>: Send + Sync {
    /// Return matching records in store order, honoring `query.limit`.
    fn query(&self, query: &Query) -> Result<Vec<R>, StorageError>;

    /// Insert new records, assigning ids in place. Records that already carry
    /// an id are rejected with `DuplicateKey`.
    fn insert(&self, records: &mut [R]) -> Result<(), StorageError>;

    /// Replace existing records. Every id must exist.
    fn update(&self, records: &[R]) -> Result<(), StorageError>;

    /// Insert records without an id, update records with one.
    fn upsert(&self, records: &mut [R]) -> Result<(), StorageError>;

    /// Delete records by id. Every id must exist.
    fn delete(&self, ids: &[RecordId]) -> Result<(), StorageError>;

    /// Insert a single record.
    fn insert_one(&self, record: &mut R) -> Result<(), StorageError> {
        self.insert(std::slice::from_mut(record))
    }

    /// Update a single record.
    fn update_one(&self, record: &R) -> Result<(), StorageError> {
        self.update(std::slice::from_ref(record))
    }

    /// Run a query that must match exactly one record.
    ///
    /// # Errors
    /// - `NoRows` when nothing matches
    /// - `TooManyRows` when more than one record matches
    fn query_one(&self, query: &Query) -> Result<R, StorageError> {
        let mut rows = self.query(query)?;
        match rows.len() {
            0 => Err(StorageError::NoRows { kind: R::KIND }),
            1 => Ok(rows.remove(0)),
            count => Err(StorageError::TooManyRows {
                kind: R::KIND,
                count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Account, Contact, Opportunity};

    // Compile-time test: ensure the trait is object-safe for every kind
    fn _assert_account_store_object_safe(_: &dyn RecordStore<Account>) {}
    fn _assert_opportunity_store_object_safe(_: &dyn RecordStore<Opportunity>) {}
    fn _assert_contact_store_object_safe(_: &dyn RecordStore<Contact>) {}

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotFound {
            kind: "Account",
            id: RecordId::new(),
        };
        assert!(err.to_string().contains("Account not found"));

        let err = StorageError::NoRows { kind: "Contact" };
        assert!(err.to_string().contains("No Contact rows"));
    }

    #[test]
    fn query_matches_all_filters() {
        let account = Account::new("Acme").with_type("Customer");

        let q = Query::new().eq(Account::NAME, "Acme");
        assert!(q.matches(&account).unwrap());

        let q = Query::new()
            .eq(Account::NAME, "Acme")
            .eq(Account::ACCOUNT_TYPE, "Partner");
        assert!(!q.matches(&account).unwrap());

        // Equality is exact and case-sensitive.
        let q = Query::new().eq(Account::NAME, "acme");
        assert!(!q.matches(&account).unwrap());
    }

    #[test]
    fn query_rejects_unknown_field() {
        let q = Query::new().eq("phone", "555");
        assert!(matches!(
            q.matches(&Account::new("Acme")),
            Err(StorageError::UnknownField { kind: "Account", .. })
        ));
    }
}
