//! Pure planning steps for recordops.
//!
//! These functions decide what to write without touching a store, so they
//! can be tested on plain values. [`RecordService`](crate::service::RecordService)
//! runs the queries and issues the writes.

mod dedup;
mod resolve;

pub use dedup::{close_date, plan_new_opportunities};
pub use resolve::{decide_parent, ParentDecision};
