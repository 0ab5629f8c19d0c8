//! Task store use-case service.
//!
//! # Responsibility
//! - Own the canonical ordered task list for one user.
//! - Mirror every mutation to the repository as a full-list write.
//! - Expose read-only snapshots and pending/completed partitions.
//!
//! # Invariants
//! - Write-then-commit: memory changes only after the repository accepted
//!   the new list. A failed write leaves the list exactly as it was.
//! - Task ids are unique within the store; the allocator never reissues one.
//! - After a failed load no mutation is written until a reload succeeds, so
//!   a blob that could not be read is never overwritten.
//! - Mutations take `&mut self`, so one store has a single writer.

use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use chrono::Utc;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, TaskStoreError>;

/// Service error for task store mutations.
#[derive(Debug)]
pub enum TaskStoreError {
    /// Input rejected before any write happened.
    Validation(TaskValidationError),
    /// No task with this id is held by the store.
    NotFound(TaskId),
    /// Persistence failed; in-memory state was not changed.
    Repo(RepoError),
    /// The last load failed; mutations are refused until a reload succeeds.
    LoadFailed,
    /// Every id above the largest stored one has been used.
    IdsExhausted,
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::LoadFailed => {
                write!(f, "stored tasks could not be loaded; reload before editing")
            }
            Self::IdsExhausted => write!(f, "no task ids left above the largest stored id"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::LoadFailed | Self::IdsExhausted => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskStoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Counts shown on the home screen and list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Monotonic id source seeded from wall-clock milliseconds.
///
/// Ids look like the timestamps older blobs used, but two allocations in the
/// same millisecond still get distinct values.
#[derive(Debug, Clone, Default)]
struct IdAllocator {
    last_issued: i64,
}

impl IdAllocator {
    fn observe(&mut self, id: TaskId) {
        self.last_issued = self.last_issued.max(id.value());
    }

    fn next(&mut self) -> StoreResult<TaskId> {
        let floor = self
            .last_issued
            .checked_add(1)
            .ok_or(TaskStoreError::IdsExhausted)?;
        let candidate = Utc::now().timestamp_millis().max(floor);
        self.last_issued = candidate;
        Ok(TaskId(candidate))
    }
}

/// Owner of the in-memory task list and its persistence cycle.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    ids: IdAllocator,
    load_failed: bool,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Creates an empty store without touching the repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            tasks: Vec::new(),
            ids: IdAllocator::default(),
            load_failed: false,
        }
    }

    /// Creates a store and performs the startup load.
    pub fn open(repo: R) -> Self {
        let mut store = Self::new(repo);
        store.load();
        store
    }

    /// Loads persisted tasks, logging and swallowing any failure.
    ///
    /// Returns the number of tasks held afterwards. On failure the previous
    /// list (initially empty) is kept.
    pub fn load(&mut self) -> usize {
        if let Err(err) = self.try_load() {
            warn!(
                "event=tasks_load module=store status=error kept={} error={}",
                self.tasks.len(),
                err
            );
        }
        self.tasks.len()
    }

    /// Loads persisted tasks and surfaces failures to the caller.
    ///
    /// An absent blob is not an error and leaves the list untouched. A
    /// failure blocks mutations until a later load succeeds.
    pub fn try_load(&mut self) -> StoreResult<usize> {
        let result = self.read_persisted();
        self.load_failed = result.is_err();
        result
    }

    /// Returns whether mutations are blocked by a failed load.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    fn read_persisted(&mut self) -> StoreResult<usize> {
        let Some(loaded) = self.repo.load_tasks()? else {
            info!("event=tasks_load module=store status=ok source=empty count=0");
            return Ok(self.tasks.len());
        };

        let mut ids = IdAllocator::default();
        for task in &loaded {
            ids.observe(task.id);
        }
        let tasks = dedupe_ids(loaded, &mut ids)?;

        info!(
            "event=tasks_load module=store status=ok source=storage count={}",
            tasks.len()
        );
        self.tasks = tasks;
        self.ids = ids;
        Ok(self.tasks.len())
    }

    /// Creates a pending task and appends it to the list.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` for blank titles; nothing is written.
    /// - `IdsExhausted` when no larger id is left; nothing is written.
    /// - `Repo` when the write fails; the list is unchanged.
    pub fn add(&mut self, request: NewTask) -> StoreResult<Task> {
        if !request.is_submittable() {
            return Err(TaskValidationError::EmptyTitle.into());
        }

        let mut ids = self.ids.clone();
        let task = Task::new(ids.next()?, request)?;

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next, "task_add", task.id)?;
        self.ids = ids;

        Ok(task)
    }

    /// Flips the completion flag of one task.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`; nothing is written.
    /// - `Repo` when the write fails; the list is unchanged.
    pub fn toggle_completion(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        next[index] = next[index].toggled();
        let updated = next[index].clone();
        self.commit(next, "task_toggle", id)?;

        Ok(updated)
    }

    /// Removes one task and returns it.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`; nothing is written.
    /// - `Repo` when the write fails; the list is unchanged.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next, "task_delete", id)?;

        Ok(removed)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_pending())
    }

    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.completed)
    }

    pub fn summary(&self) -> TaskSummary {
        let completed = self.completed().count();
        TaskSummary {
            total: self.tasks.len(),
            pending: self.tasks.len() - completed,
            completed,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskStoreError::NotFound(id))
    }

    fn commit(&mut self, next: Vec<Task>, event: &'static str, id: TaskId) -> StoreResult<()> {
        if self.load_failed {
            warn!("event={event} module=store status=blocked task_id={id} reason=load_failed");
            return Err(TaskStoreError::LoadFailed);
        }
        if let Err(err) = self.repo.save_tasks(&next) {
            error!("event={event} module=store status=error task_id={id} error={err}");
            return Err(err.into());
        }
        info!(
            "event={event} module=store status=ok task_id={id} count={}",
            next.len()
        );
        self.tasks = next;
        Ok(())
    }
}

/// Gives every repeated id a fresh one, keeping the first holder as is.
///
/// `ids` must already have observed every loaded id, so fresh ids are above
/// all of them and cannot collide.
fn dedupe_ids(tasks: Vec<Task>, ids: &mut IdAllocator) -> StoreResult<Vec<Task>> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut deduped = Vec::with_capacity(tasks.len());
    for mut task in tasks {
        if seen.contains(&task.id) {
            let fresh = ids.next()?;
            warn!(
                "event=tasks_load module=store status=repaired duplicate_id={} new_id={}",
                task.id, fresh
            );
            task.id = fresh;
        }
        seen.insert(task.id);
        deduped.push(task);
    }
    Ok(deduped)
}
