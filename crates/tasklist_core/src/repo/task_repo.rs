//! Task list repository over a key-value store.
//!
//! # Responsibility
//! - Encode the full task list as one JSON array under a fixed key.
//! - Decode and validate that array on load, record by record.
//!
//! # Invariants
//! - Every save is a full-list overwrite; there are no per-task keys.
//! - An absent key means "no tasks saved yet" and is not an error.
//! - A record that fails validation is skipped; it never hides the others.

use crate::model::task::{Task, TaskValidationError};
use crate::storage::{KeyValueStore, StorageError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Key the task blob is stored under.
pub const TASKS_KEY: &str = "tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task list persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Storage(StorageError),
    Encode(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Whole-list persistence contract used by `TaskStore`.
pub trait TaskRepository {
    /// Returns `None` when nothing has been saved yet.
    fn load_tasks(&self) -> RepoResult<Option<Vec<Task>>>;
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// JSON-blob repository writing through any `KeyValueStore`.
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    /// Uses the default `tasks` key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, TASKS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> RepoResult<Option<Vec<Task>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        decode_tasks(&raw).map(Some)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let started_at = Instant::now();
        let payload = encode_tasks(tasks)?;

        match self.store.set(&self.key, &payload) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=repo status=ok count={} bytes={} duration_ms={}",
                    tasks.len(),
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=repo status=error count={} duration_ms={} error={}",
                    tasks.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

/// Encodes a task list into the persisted blob format.
///
/// # Errors
/// - `Validation` when any task breaks a model invariant.
pub fn encode_tasks(tasks: &[Task]) -> RepoResult<String> {
    for task in tasks {
        task.validate()?;
    }
    serde_json::to_string(tasks).map_err(RepoError::Encode)
}

/// Decodes the persisted blob into an ordered task list.
///
/// Invalid records are logged and dropped; the remaining tasks keep their
/// stored order.
///
/// # Errors
/// - `InvalidData` when the blob is not a JSON array.
pub fn decode_tasks(raw: &str) -> RepoResult<Vec<Task>> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|err| RepoError::InvalidData(err.to_string()))?;

    let mut tasks = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) => tasks.push(task),
            Err(err) => warn!(
                "event=tasks_decode module=repo status=skipped index={index} error={err}"
            ),
        }
    }
    Ok(tasks)
}
