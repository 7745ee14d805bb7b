//! Record service: runs the planning steps against injected stores.
//!
//! Each public method is a standalone operation. Store calls are made
//! sequentially on the caller's thread, and any store failure is returned
//! unchanged, aborting that call's batch.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::{RecordResult, ValidationError};
use crate::operations::{decide_parent, plan_new_opportunities, ParentDecision};
use crate::record::{Account, Contact, Opportunity};
use crate::storage::{Query, RecordStore};

/// Result of [`RecordService::upsert_opportunities`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityUpsert {
    /// The resolved parent, `None` when the call short-circuited on empty input.
    pub account: Option<Account>,
    /// Newly persisted opportunities, in candidate order.
    pub created: Vec<Opportunity>,
    /// Candidates skipped because the account already had an opportunity with that name.
    pub skipped: usize,
}

/// Record operations over pluggable stores.
#[derive(Clone)]
pub struct RecordService {
    accounts: Arc<dyn RecordStore<Account>>,
    opportunities: Arc<dyn RecordStore<Opportunity>>,
    contacts: Arc<dyn RecordStore<Contact>>,
    config: ServiceConfig,
    fixed_today: Option<NaiveDate>,
}

impl RecordService {
    /// Create a service with the default config.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn RecordStore<Account>>,
        opportunities: Arc<dyn RecordStore<Opportunity>>,
        contacts: Arc<dyn RecordStore<Contact>>,
    ) -> Self {
        Self {
            accounts,
            opportunities,
            contacts,
            config: ServiceConfig::default(),
            fixed_today: None,
        }
    }

    /// Replace the config.
    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin "today" instead of reading the system clock.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// The active config.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Insert one account and read it back.
    ///
    /// `account_type` falls back to the configured default classification.
    ///
    /// # Errors
    /// - `EmptyName` for a blank name
    /// - Storage errors from the insert or the read-back, including `NoRows`
    ///   if the stored record cannot be found again
    pub fn insert_account(&self, name: &str, account_type: Option<&str>) -> RecordResult<Account> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let mut account = Account::new(name);
        account.account_type = account_type
            .map(str::to_string)
            .or_else(|| self.config.default_account_type.clone());
        self.accounts.insert_one(&mut account)?;

        let id = account.id.ok_or_else(|| ValidationError::MissingField {
            field: "account.id".to_string(),
        })?;
        let stored = self.accounts.query_one(&Query::new().eq("id", id))?;
        info!(account_id = %id, name, "inserted account");
        Ok(stored)
    }

    /// Find the first account named exactly `name` and mark it updated, or
    /// insert a new one marked created. Exactly one write either way.
    ///
    /// # Errors
    /// `EmptyName` for a blank name; storage errors from the lookup or write.
    pub fn resolve_or_create_account(&self, name: &str) -> RecordResult<Account> {
        let existing = self
            .accounts
            .query(&Query::new().eq(Account::NAME, name).limit(1))?;
        let decision = decide_parent(name, &existing, &self.config.markers)?;
        self.apply_parent(decision)
    }

    fn apply_parent(&self, decision: ParentDecision) -> RecordResult<Account> {
        match decision {
            ParentDecision::Create(mut account) => {
                self.accounts.insert_one(&mut account)?;
                debug!(account_id = ?account.id, name = %account.name, "created parent account");
                Ok(account)
            }
            ParentDecision::Update(account) => {
                self.accounts.update_one(&account)?;
                debug!(account_id = ?account.id, name = %account.name, "updated parent account");
                Ok(account)
            }
        }
    }

    /// Build unpersisted opportunities under `parent` for every candidate
    /// name the account does not already have.
    ///
    /// # Errors
    /// - `MissingField` if `parent` has no id
    /// - `InvalidCloseDate` if the default close date overflows
    /// - Storage errors from the lookup
    pub fn build_new_opportunities<S: AsRef<str>>(
        &self,
        parent: &Account,
        candidates: &[S],
    ) -> RecordResult<Vec<Opportunity>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let parent_id = parent.id.ok_or_else(|| ValidationError::MissingField {
            field: "account.id".to_string(),
        })?;
        let existing_names: HashSet<String> = self
            .opportunities
            .query(&Query::new().eq(Opportunity::ACCOUNT_ID, parent_id))?
            .into_iter()
            .map(|o| o.name)
            .collect();

        let planned = plan_new_opportunities(
            parent_id,
            candidates,
            &existing_names,
            &self.config.opportunity,
            self.today(),
        )?;
        debug!(
            account_id = %parent_id,
            candidates = candidates.len(),
            existing = existing_names.len(),
            planned = planned.len(),
            "planned new opportunities"
        );
        Ok(planned)
    }

    /// Resolve the named account, then add the missing opportunities in a
    /// single combined upsert.
    ///
    /// An empty candidate list returns immediately without touching the
    /// store. When every candidate already exists no opportunity write is
    /// issued.
    ///
    /// # Errors
    /// Anything [`resolve_or_create_account`](Self::resolve_or_create_account)
    /// or [`build_new_opportunities`](Self::build_new_opportunities) returns,
    /// plus storage errors from the upsert.
    pub fn upsert_opportunities<S: AsRef<str>>(
        &self,
        account_name: &str,
        candidates: &[S],
    ) -> RecordResult<OpportunityUpsert> {
        if candidates.is_empty() {
            return Ok(OpportunityUpsert {
                account: None,
                created: Vec::new(),
                skipped: 0,
            });
        }

        let account = self.resolve_or_create_account(account_name)?;
        let mut created = self.build_new_opportunities(&account, candidates)?;
        if !created.is_empty() {
            self.opportunities.upsert(&mut created)?;
        }

        let skipped = candidates.len() - created.len();
        info!(
            account = %account.name,
            created = created.len(),
            skipped,
            "upserted opportunities"
        );
        Ok(OpportunityUpsert {
            account: Some(account),
            created,
            skipped,
        })
    }

    /// Link each contact to the account named by its surname, creating
    /// accounts as needed, then upsert all contacts in one combined write.
    ///
    /// Resolution runs once per contact, so two contacts sharing a surname
    /// see the same account (the second call updates it).
    ///
    /// # Errors
    /// The first resolver or storage error aborts the call; contacts are not
    /// written in that case, though accounts resolved before the failure
    /// remain.
    pub fn link_contacts_to_accounts(&self, mut contacts: Vec<Contact>) -> RecordResult<Vec<Contact>> {
        if contacts.is_empty() {
            return Ok(contacts);
        }

        for contact in &mut contacts {
            let account = self.resolve_or_create_account(contact.derived_account_name())?;
            contact.account_id = account.id;
        }

        self.contacts.upsert(&mut contacts)?;
        info!(contacts = contacts.len(), "linked contacts to accounts");
        Ok(contacts)
    }

    /// Insert throwaway accounts in one combined write, then delete exactly
    /// those records in another. Returns the number deleted.
    ///
    /// # Errors
    /// Storage errors from either write. If the insert fails nothing is
    /// deleted.
    pub fn create_and_delete_accounts<S: AsRef<str>>(&self, names: &[S]) -> RecordResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let mut accounts: Vec<Account> = names.iter().map(|n| Account::new(n.as_ref())).collect();
        self.accounts.insert(&mut accounts)?;

        let ids: Vec<_> = accounts.iter().filter_map(|a| a.id).collect();
        self.accounts.delete(&ids)?;
        debug!(deleted = ids.len(), "deleted disposable accounts");
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryRecordStore, StorageError, WriteOp};
    use crate::RecordError;

    struct Fixture {
        service: RecordService,
        accounts: Arc<InMemoryRecordStore<Account>>,
        opportunities: Arc<InMemoryRecordStore<Opportunity>>,
        contacts: Arc<InMemoryRecordStore<Contact>>,
    }

    fn fixture() -> Fixture {
        let accounts = Arc::new(InMemoryRecordStore::<Account>::new());
        let opportunities = Arc::new(InMemoryRecordStore::<Opportunity>::new());
        let contacts = Arc::new(InMemoryRecordStore::<Contact>::new());
        let service = RecordService::new(accounts.clone(), opportunities.clone(), contacts.clone())
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        Fixture {
            service,
            accounts,
            opportunities,
            contacts,
        }
    }

    #[test]
    fn insert_account_uses_default_type() {
        let f = fixture();
        let config = ServiceConfig {
            default_account_type: Some("Prospect".to_string()),
            ..ServiceConfig::default()
        };
        let service = f.service.clone().with_config(config);

        let a = service.insert_account("Acme", None).unwrap();
        assert_eq!(a.account_type.as_deref(), Some("Prospect"));
        let b = service.insert_account("Globex", Some("Partner")).unwrap();
        assert_eq!(b.account_type.as_deref(), Some("Partner"));
        assert_eq!(f.accounts.len().unwrap(), 2);
    }

    #[test]
    fn insert_account_rejects_blank_name_without_writing() {
        let f = fixture();
        let err = f.service.insert_account(" ", None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(f.accounts.write_count().unwrap(), 0);
    }

    #[test]
    fn resolver_issues_one_write_per_call() {
        let f = fixture();
        f.service.resolve_or_create_account("Acme").unwrap();
        f.service.resolve_or_create_account("Acme").unwrap();

        let ops: Vec<WriteOp> = f.accounts.writes().unwrap().iter().map(|w| w.op).collect();
        assert_eq!(ops, vec![WriteOp::Insert, WriteOp::Update]);
    }

    #[test]
    fn build_requires_persisted_parent() {
        let f = fixture();
        let err = f
            .service
            .build_new_opportunities(&Account::new("Acme"), &["A"])
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Validation(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn upsert_skips_write_when_all_exist() {
        let f = fixture();
        f.service.upsert_opportunities("Acme", &["A", "B"]).unwrap();
        let before = f.opportunities.write_count().unwrap();

        let outcome = f.service.upsert_opportunities("Acme", &["B", "A"]).unwrap();
        assert!(outcome.created.is_empty());
        assert_eq!(outcome.skipped, 2);
        assert_eq!(f.opportunities.write_count().unwrap(), before);
    }

    #[test]
    fn blank_surname_aborts_contact_batch() {
        let f = fixture();
        let contacts = vec![Contact::new("John", "Doe"), Contact::new("Nobody", "")];
        let err = f.service.link_contacts_to_accounts(contacts).unwrap_err();
        assert!(matches!(err, RecordError::Validation(ValidationError::EmptyName)));
        assert_eq!(f.contacts.write_count().unwrap(), 0);
        // The first contact's account was already resolved.
        assert_eq!(f.accounts.len().unwrap(), 1);
    }

    #[test]
    fn create_and_delete_leaves_store_empty() {
        let f = fixture();
        f.service.insert_account("Keep", None).unwrap();
        let deleted = f
            .service
            .create_and_delete_accounts(&["Temp 1", "Temp 2", "Temp 3"])
            .unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(f.accounts.len().unwrap(), 1);

        let ops: Vec<(WriteOp, usize)> = f
            .accounts
            .writes()
            .unwrap()
            .iter()
            .map(|w| (w.op, w.records))
            .collect();
        assert_eq!(
            ops,
            vec![(WriteOp::Insert, 1), (WriteOp::Insert, 3), (WriteOp::Delete, 3)]
        );
    }

    #[test]
    fn create_and_delete_propagates_insert_failure() {
        let f = fixture();
        let err = f
            .service
            .create_and_delete_accounts(&["Temp", ""])
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Storage(StorageError::ValidationFailed { .. })
        ));
        let writes = f.accounts.writes().unwrap();
        assert_eq!(writes.len(), 1);
        assert!(!writes[0].applied);
    }
}
