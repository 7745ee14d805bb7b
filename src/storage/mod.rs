//! Storage traits and backends for recordops.
//!
//! The traits define the abstract interface for record stores; the
//! in-memory backend is the reference implementation.

mod memory;
mod traits;

pub use memory::{InMemoryRecordStore, WriteCall, WriteOp};
pub use traits::{Filter, Query, RecordStore, StorageError};
