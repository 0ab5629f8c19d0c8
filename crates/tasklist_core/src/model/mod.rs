//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the task record and its creation request.
//! - Keep field-level invariants next to the data they guard.
//!
//! # Invariants
//! - Every task is identified by a store-unique `TaskId`.
//! - Deletion is a hard removal from the list; there are no tombstones.

pub mod task;
