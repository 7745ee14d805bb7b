//! # recordops - Record upsert helpers over a pluggable store
//!
//! recordops performs create, update, upsert and delete operations against a
//! record store holding business objects, keyed by natural names rather than
//! store ids.
//!
//! ## Core Concepts
//!
//! - **Account**: a parent record, found or created by display name
//! - **Opportunity**: a dependent record, deduplicated by name per account
//! - **Contact**: a dependent record linked to the account named by its surname
//! - **RecordStore**: the injectable store; every write call is all-or-nothing
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use recordops::{Account, Contact, InMemoryRecordStore, Opportunity, RecordService};
//!
//! let accounts = Arc::new(InMemoryRecordStore::<Account>::new());
//! let opportunities = Arc::new(InMemoryRecordStore::<Opportunity>::new());
//! let contacts = Arc::new(InMemoryRecordStore::<Contact>::new());
//! let service = RecordService::new(accounts, opportunities, contacts);
//!
//! let outcome = service.upsert_opportunities("Acme", &["Renewal", "Upsell"])?;
//! assert_eq!(outcome.created.len(), 2);
//!
//! // Existing names are skipped.
//! let outcome = service.upsert_opportunities("Acme", &["Renewal", "Expansion"])?;
//! assert_eq!(outcome.created.len(), 1);
//! # Ok::<(), recordops::RecordError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod operations;
pub mod record;
pub mod service;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use config::{Markers, OpportunityDefaults, ServiceConfig};
pub use error::{ConfigError, RecordError, RecordResult, ValidationError};
pub use operations::{close_date, decide_parent, plan_new_opportunities, ParentDecision};
pub use record::{Account, Contact, FieldValue, Opportunity, Record, RecordId};
pub use service::{OpportunityUpsert, RecordService};
pub use storage::{
    Filter, InMemoryRecordStore, Query, RecordStore, StorageError, WriteCall, WriteOp,
};
