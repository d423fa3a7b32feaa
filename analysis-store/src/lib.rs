//! SQLite-backed document store for pull-request analysis records.
//!
//! One record per (`repository`, `pr_number`), enforced by a composite UNIQUE
//! constraint. A second create for the same pair fails with
//! [`StoreError::Duplicate`] instead of overwriting; the constraint, not an
//! in-process lock, is what keeps concurrent analyses of the same PR from
//! producing two records.

pub mod errors;
pub mod schema;
pub mod store;
pub mod types;

pub use errors::{StoreError, StoreResult};
pub use store::AnalysisStore;
pub use types::{AnalysisRecord, Issue, Severity};
