//! Host-facing bindings for the task list core.

pub mod api;
