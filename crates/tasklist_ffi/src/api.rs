//! FFI use-case API for the mobile host.
//!
//! # Responsibility
//! - Expose task list operations to Dart via FRB as plain envelopes.
//! - Hold the process-wide task store behind one mutex.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation runs its full read-modify-write cycle under the lock.
//! - A failed `configure_store` keeps the previously active store.

use log::info;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tasklist_core::config::DEFAULT_DB_FILE_NAME;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_task_store,
    ping as ping_inner, NewTask, SqliteTaskStore, Task, TaskCategory, TaskId, TasklistConfig,
};

static STORE: Mutex<Option<SqliteTaskStore>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
/// Safe to call repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Points the task store at an app-private SQLite file and loads it.
///
/// # FFI contract
/// - Sync call; opens the file and runs migrations.
/// - Returns an empty string on success and an error message otherwise.
/// - On failure the previously active store stays in place.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    match open_at(PathBuf::from(trimmed)) {
        Ok(store) => {
            *lock_store() = Some(store);
            String::new()
        }
        Err(err) => err,
    }
}

/// Task row as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// `work|home|business`.
    pub category: String,
    pub completed: bool,
    /// ISO-8601 UTC creation time.
    pub created_at: String,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title,
            description: task.description,
            category: task.category.as_str().to_string(),
            completed: task.completed,
            created_at: task.created_at,
        }
    }
}

/// Envelope for add/toggle/delete calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Created, updated or removed task.
    pub task: Option<TaskItem>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Task) -> Self {
        Self {
            ok: true,
            task: Some(task.into()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Tasks in insertion order.
    pub items: Vec<TaskItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummaryResponse {
    pub ok: bool,
    pub total: u32,
    pub pending: u32,
    pub completed: u32,
    pub message: String,
}

/// Creates a task from the add form.
///
/// `category` accepts `work|home|business`; empty means `work`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String, description: String, category: String) -> TaskActionResponse {
    let category = if category.trim().is_empty() {
        TaskCategory::default()
    } else {
        match TaskCategory::parse(&category) {
            Some(category) => category,
            None => {
                return TaskActionResponse::failure(format!(
                    "task_add failed: unknown category `{}`",
                    category.trim()
                ))
            }
        }
    };

    let request = NewTask::new(title, description, category);
    match with_store(|store| store.add(request).map_err(|err| err.to_string())) {
        Ok(task) => TaskActionResponse::success("Task created.", task),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips completion of one task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> TaskActionResponse {
    match with_store(|store| {
        store
            .toggle_completion(TaskId(id))
            .map_err(|err| err.to_string())
    }) {
        Ok(task) => TaskActionResponse::success("Task updated.", task),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Deletes one task.
///
/// The host must leave any details screen showing `id` on success.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    match with_store(|store| store.delete(TaskId(id)).map_err(|err| err.to_string())) {
        Ok(task) => TaskActionResponse::success("Task deleted.", task),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Lists tasks; `filter` is `all|pending|completed` (empty means all).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: String) -> TaskListResponse {
    let filter = filter.trim().to_ascii_lowercase();
    let keep: fn(&Task) -> bool = match filter.as_str() {
        "" | "all" => |_| true,
        "pending" => Task::is_pending,
        "completed" => |task| task.completed,
        other => {
            return TaskListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("tasks_list failed: unknown filter `{other}`"),
            }
        }
    };

    match with_store(|store| {
        Ok(store
            .tasks()
            .iter()
            .filter(|task| keep(task))
            .cloned()
            .map(TaskItem::from)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Pending/completed counts for the home screen.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_summary() -> TaskSummaryResponse {
    match with_store(|store| Ok(store.summary())) {
        Ok(summary) => TaskSummaryResponse {
            ok: true,
            total: saturating_u32(summary.total),
            pending: saturating_u32(summary.pending),
            completed: saturating_u32(summary.completed),
            message: format!(
                "{} pending, {} completed.",
                summary.pending, summary.completed
            ),
        },
        Err(err) => TaskSummaryResponse {
            ok: false,
            total: 0,
            pending: 0,
            completed: 0,
            message: format!("tasks_summary failed: {err}"),
        },
    }
}

fn open_at(db_path: PathBuf) -> Result<SqliteTaskStore, String> {
    let config = TasklistConfig {
        db_path,
        ..TasklistConfig::default()
    };
    let store = open_task_store(&config)
        .map_err(|err| format!("task DB open failed: {err}"))?;
    info!(
        "event=store_configure module=ffi status=ok count={} load_failed={}",
        store.len(),
        store.load_failed()
    );
    Ok(store)
}

fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var("TASKLIST_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn lock_store() -> MutexGuard<'static, Option<SqliteTaskStore>> {
    STORE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_store<T>(
    f: impl FnOnce(&mut SqliteTaskStore) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = lock_store();
    if guard.is_none() {
        *guard = Some(open_at(default_db_path())?);
    }
    match guard.as_mut() {
        Some(store) => f(store),
        None => Err("task store is not configured".to_string()),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store, core_version, init_logging, ping, task_add, task_delete, task_toggle,
        tasks_list, tasks_summary,
    };
    use std::sync::Once;

    static TEST_STORE: Once = Once::new();

    fn use_test_store() {
        TEST_STORE.call_once(|| {
            let dir = std::env::temp_dir().join(format!("tasklist-ffi-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("tasks.sqlite3");
            let _ = std::fs::remove_file(&path);
            let error = configure_store(path.to_str().unwrap().to_string());
            assert!(error.is_empty(), "{error}");
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_rejects_blank_and_unopenable_paths() {
        use_test_store();
        assert!(!configure_store("  ".to_string()).is_empty());

        let missing_dir = std::env::temp_dir()
            .join("tasklist-ffi-missing-dir")
            .join("nested")
            .join("tasks.sqlite3");
        let error = configure_store(missing_dir.to_str().unwrap().to_string());
        assert!(error.contains("task DB open failed"), "{error}");

        assert!(tasks_list(String::new()).ok);
    }

    #[test]
    fn add_toggle_delete_roundtrip() {
        use_test_store();
        let created = task_add(
            "Renew passport".to_string(),
            String::new(),
            "casa".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let item = created.task.unwrap();
        assert_eq!(item.category, "home");
        assert!(!item.completed);

        let toggled = task_toggle(item.id);
        assert!(toggled.ok, "{}", toggled.message);
        assert!(toggled.task.unwrap().completed);
        assert!(tasks_list("completed".to_string())
            .items
            .iter()
            .any(|task| task.id == item.id));
        assert!(tasks_summary().completed >= 1);

        let deleted = task_delete(item.id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!tasks_list("all".to_string())
            .items
            .iter()
            .any(|task| task.id == item.id));
    }

    #[test]
    fn blank_title_and_unknown_inputs_fail_cleanly() {
        use_test_store();
        let blank = task_add("   ".to_string(), String::new(), String::new());
        assert!(!blank.ok);
        assert!(blank.message.contains("title"));

        let bad_category = task_add("x".to_string(), String::new(), "garden".to_string());
        assert!(!bad_category.ok);

        assert!(!task_toggle(-1).ok);
        assert!(!task_delete(-1).ok);
        assert!(!tasks_list("archived".to_string()).ok);
    }
}
