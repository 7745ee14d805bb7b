//! In-memory storage backend.
//!
//! Thread-safe in-memory implementation of [`RecordStore`]. It is intended
//! for embedded usage, tests, and as a reference implementation of the
//! all-or-nothing write contract.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::Serialize;

use crate::record::{Record, RecordId};
use crate::storage::traits::{Query, RecordStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// Kind of write call issued against a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOp {
    /// `insert`
    Insert,
    /// `update`
    Update,
    /// `upsert`
    Upsert,
    /// `delete`
    Delete,
}

/// One entry of the write journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteCall {
    /// Which write.
    pub op: WriteOp,
    /// Number of records submitted in the call.
    pub records: usize,
    /// False when the call was rejected and nothing was applied.
    pub applied: bool,
}

#[derive(Debug)]
struct StoreState<R> {
    by_id: HashMap<RecordId, R>,
    order: Vec<RecordId>,
    journal: Vec<WriteCall>,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            order: Vec::new(),
            journal: Vec::new(),
        }
    }
}

impl<R: Record> StoreState<R> {
    fn check_new(&self, record: &R) -> Result<(), StorageError> {
        if let Some(id) = record.id() {
            return Err(StorageError::DuplicateKey(id.to_string()));
        }
        validate(record)
    }

    fn check_existing(&self, record: &R, seen: &mut HashSet<RecordId>) -> Result<(), StorageError> {
        let Some(id) = record.id() else {
            return Err(StorageError::ValidationFailed {
                kind: R::KIND,
                reason: "id is required to update a record".to_string(),
            });
        };
        self.check_known(id, seen)?;
        validate(record)
    }

    fn check_known(&self, id: RecordId, seen: &mut HashSet<RecordId>) -> Result<(), StorageError> {
        if !self.by_id.contains_key(&id) {
            return Err(StorageError::NotFound { kind: R::KIND, id });
        }
        if !seen.insert(id) {
            return Err(StorageError::DuplicateKey(format!("{id} appears twice in batch")));
        }
        Ok(())
    }

    fn put_new(&mut self, record: &mut R) {
        let id = RecordId::new();
        record.set_id(id);
        self.order.push(id);
        self.by_id.insert(id, record.clone());
    }

    fn replace(&mut self, record: &R) {
        if let Some(id) = record.id() {
            self.by_id.insert(id, record.clone());
        }
    }

    fn log(&mut self, op: WriteOp, records: usize, result: &Result<(), StorageError>) {
        self.journal.push(WriteCall {
            op,
            records,
            applied: result.is_ok(),
        });
    }
}

fn validate<R: Record>(record: &R) -> Result<(), StorageError> {
    record
        .validate()
        .map_err(|reason| StorageError::ValidationFailed {
            kind: R::KIND,
            reason,
        })
}

/// Thread-safe in-memory record store for one record kind.
///
/// Query results come back in insertion order, so "first match" is the
/// oldest matching record.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    state: RwLock<StoreState<R>>,
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("store.len"))?;
        Ok(state.order.len())
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: RecordId) -> Result<Option<R>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("store.get"))?;
        Ok(state.by_id.get(&id).cloned())
    }

    /// Every write call issued so far, oldest first.
    pub fn writes(&self) -> Result<Vec<WriteCall>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("store.writes"))?;
        Ok(state.journal.clone())
    }

    /// Number of write calls issued so far (applied or not).
    pub fn write_count(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("store.write_count"))?;
        Ok(state.journal.len())
    }

    /// JSON array of all records in store order.
    pub fn snapshot_json(&self) -> Result<serde_json::Value, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("store.snapshot_json"))?;
        let rows: Vec<&R> = state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id))
            .collect();
        serde_json::to_value(rows).map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    fn query(&self, query: &Query) -> Result<Vec<R>, StorageError> {
        let unknown = query
            .filters
            .iter()
            .find(|f| !R::FIELDS.iter().any(|known| *known == f.field));
        if let Some(filter) = unknown {
            return Err(StorageError::UnknownField {
                kind: R::KIND,
                field: filter.field.clone(),
            });
        }

        let state = self.state.read().map_err(|_| lock_err("store.query"))?;
        let limit = query.limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for id in &state.order {
            if out.len() >= limit {
                break;
            }
            let Some(record) = state.by_id.get(id) else {
                continue;
            };
            if query.matches(record)? {
                out.push(record.clone());
            }
        }
        Ok(out)
    }

    fn insert(&self, records: &mut [R]) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("store.insert"))?;
        let checked = records.iter().try_for_each(|r| state.check_new(r));
        state.log(WriteOp::Insert, records.len(), &checked);
        checked?;

        for record in records.iter_mut() {
            state.put_new(record);
        }
        Ok(())
    }

    fn update(&self, records: &[R]) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("store.update"))?;
        let mut seen = HashSet::new();
        let checked = records
            .iter()
            .try_for_each(|r| state.check_existing(r, &mut seen));
        state.log(WriteOp::Update, records.len(), &checked);
        checked?;

        for record in records {
            state.replace(record);
        }
        Ok(())
    }

    fn upsert(&self, records: &mut [R]) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("store.upsert"))?;
        let mut seen = HashSet::new();
        let checked = records.iter().try_for_each(|r| {
            if r.id().is_some() {
                state.check_existing(r, &mut seen)
            } else {
                state.check_new(r)
            }
        });
        state.log(WriteOp::Upsert, records.len(), &checked);
        checked?;

        for record in records.iter_mut() {
            if record.id().is_some() {
                state.replace(record);
            } else {
                state.put_new(record);
            }
        }
        Ok(())
    }

    fn delete(&self, ids: &[RecordId]) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("store.delete"))?;
        let mut seen = HashSet::new();
        let checked = ids.iter().try_for_each(|id| state.check_known(*id, &mut seen));
        state.log(WriteOp::Delete, ids.len(), &checked);
        checked?;

        for id in ids {
            state.by_id.remove(id);
        }
        state.order.retain(|id| !seen.contains(id));
        Ok(())
    }
}
