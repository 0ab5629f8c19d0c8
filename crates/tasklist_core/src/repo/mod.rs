//! Repository layer between the task store and the key-value adapter.
//!
//! # Responsibility
//! - Define the load/save contract for the whole task list.
//! - Isolate the blob encoding from store orchestration.
//!
//! # Invariants
//! - Writes validate every task before encoding.
//! - Reads reject invalid persisted state instead of masking it.

pub mod task_repo;
