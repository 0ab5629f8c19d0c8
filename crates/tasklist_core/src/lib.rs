//! Core domain logic for the to-do list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use config::{load_config, ConfigError, TasklistConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::task::{NewTask, Task, TaskCategory, TaskId, TaskValidationError};
pub use repo::task_repo::{KvTaskRepository, RepoError, RepoResult, TaskRepository, TASKS_KEY};
pub use service::task_store::{StoreResult, TaskStore, TaskStoreError, TaskSummary};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use view::{Screen, ViewState};

/// Task store persisted in an on-device SQLite key-value table.
pub type SqliteTaskStore = TaskStore<KvTaskRepository<SqliteKeyValueStore>>;

/// Opens the SQLite file named by `config` and loads its tasks.
pub fn open_task_store(config: &TasklistConfig) -> StorageResult<SqliteTaskStore> {
    let kv = SqliteKeyValueStore::open(&config.db_path)?;
    let repo = KvTaskRepository::with_key(kv, config.storage_key.clone());
    Ok(TaskStore::open(repo))
}

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
