//! Resolve-or-create decision for parent accounts.
//!
//! The decision is pure: given the requested name and the rows a name lookup
//! returned, it says which single write the caller must issue.

use crate::config::Markers;
use crate::error::ValidationError;
use crate::record::Account;

/// The write a caller must issue to resolve a parent account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentDecision {
    /// No match: insert this new account.
    Create(Account),
    /// Matched: update this existing account.
    Update(Account),
}

impl ParentDecision {
    /// Returns true if the account must be inserted.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }

    /// The account to write.
    #[must_use]
    pub fn account(&self) -> &Account {
        match self {
            Self::Create(a) | Self::Update(a) => a,
        }
    }

    /// Consume the decision, returning the account to write.
    #[must_use]
    pub fn into_account(self) -> Account {
        match self {
            Self::Create(a) | Self::Update(a) => a,
        }
    }
}

/// Decide how to resolve `name` against the rows an exact-name lookup found.
///
/// Only the first row is considered; further duplicates are ignored without
/// error. The name is used verbatim.
///
/// # Errors
/// `EmptyName` if `name` is empty or whitespace.
///
/// # Examples
///
/// ```
/// use recordops::{decide_parent, Markers};
///
/// let decision = decide_parent("Acme", &[], &Markers::default()).unwrap();
/// assert!(decision.is_create());
/// assert_eq!(decision.account().description.as_deref(), Some("New"));
/// ```
pub fn decide_parent(
    name: &str,
    existing: &[Account],
    markers: &Markers,
) -> Result<ParentDecision, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(match existing.first() {
        Some(found) => {
            let mut account = found.clone();
            account.description = Some(markers.updated.clone());
            ParentDecision::Update(account)
        }
        None => ParentDecision::Create(
            Account::new(name).with_description(markers.created.clone()),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn stored(name: &str) -> Account {
        let mut a = Account::new(name).with_type("Customer");
        a.id = Some(RecordId::new());
        a
    }

    #[test]
    fn creates_when_nothing_matched() {
        let decision = decide_parent("Acme", &[], &Markers::default()).unwrap();
        let ParentDecision::Create(account) = decision else {
            panic!("expected create");
        };
        assert_eq!(account.name, "Acme");
        assert!(account.id.is_none());
        assert_eq!(account.description.as_deref(), Some("New"));
    }

    #[test]
    fn updates_first_match_only() {
        let first = stored("Acme");
        let second = stored("Acme");
        let decision =
            decide_parent("Acme", &[first.clone(), second], &Markers::default()).unwrap();
        let ParentDecision::Update(account) = decision else {
            panic!("expected update");
        };
        assert_eq!(account.id, first.id);
        assert_eq!(account.account_type.as_deref(), Some("Customer"));
        assert_eq!(account.description.as_deref(), Some("Updated"));
    }

    #[test]
    fn custom_markers() {
        let markers = Markers {
            created: "fresh".to_string(),
            updated: "seen".to_string(),
        };
        let created = decide_parent("Acme", &[], &markers).unwrap();
        assert_eq!(created.account().description.as_deref(), Some("fresh"));
        let updated = decide_parent("Acme", &[stored("Acme")], &markers).unwrap();
        assert_eq!(updated.into_account().description.as_deref(), Some("seen"));
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            decide_parent("   ", &[], &Markers::default()),
            Err(ValidationError::EmptyName)
        ));
    }
}
