//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted in the task blob.
//! - Validate write-once fields at construction and decode time.
//!
//! # Invariants
//! - `title` is non-empty after trimming surrounding whitespace.
//! - `created_at` is an RFC 3339 timestamp and never changes after creation.
//! - `completed` is the only field mutable after creation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable integer identifier of a task inside one store.
///
/// Serialized as a bare JSON number to stay readable by older blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Fixed task category chosen at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Job related work. Default for new drafts.
    #[default]
    #[serde(alias = "trabajo")]
    Work,
    /// Household chores.
    #[serde(alias = "casa")]
    Home,
    /// Side business or finances.
    #[serde(alias = "negocios")]
    Business,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [Self::Work, Self::Home, Self::Business];

    /// Wire name used in the persisted blob.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Home => "home",
            Self::Business => "business",
        }
    }

    /// Glyph shown next to the category in list and details rows.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Work => "💼",
            Self::Home => "🏠",
            Self::Business => "📈",
        }
    }

    /// Parses user or wire input, accepting legacy Spanish names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" | "trabajo" => Some(Self::Work),
            "home" | "casa" => Some(Self::Home),
            "business" | "negocios" => Some(Self::Business),
            _ => None,
        }
    }
}

impl Display for TaskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Validation failures for task construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// `createdAt` is not a valid RFC 3339 timestamp.
    InvalidCreatedAt(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::InvalidCreatedAt(value) => {
                write!(f, "createdAt `{value}` is not an RFC 3339 timestamp")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Creation request for a task.
///
/// `Default` is the blank form draft: empty text and category `work`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TaskCategory,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
        }
    }

    /// Returns whether the draft would pass title validation.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Canonical to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Serialized as `type` to match the persisted blob.
    #[serde(rename = "type")]
    pub category: TaskCategory,
    pub completed: bool,
    /// ISO-8601 UTC timestamp, millisecond precision.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Builds a pending task stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyTitle` when `request.title` trims to nothing.
    pub fn new(id: TaskId, request: NewTask) -> Result<Self, TaskValidationError> {
        Self::with_created_at(id, request, Utc::now())
    }

    /// Builds a pending task with an explicit creation instant.
    pub fn with_created_at(
        id: TaskId,
        request: NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: request.title,
            description: request.description,
            category: request.category,
            completed: false,
            created_at: format_timestamp(created_at),
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks write-once field invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(TaskValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Parsed creation instant.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }

    /// Returns a copy with `completed` flipped and every other field intact.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// Formats an instant the way JavaScript `toISOString` does.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    category: TaskCategory,
    #[serde(default)]
    completed: bool,
    #[serde(rename = "createdAt")]
    created_at: String,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            completed: record.completed,
            created_at: record.created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, NewTask, Task, TaskCategory, TaskId, TaskValidationError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn category_parse_accepts_english_and_legacy_names() {
        assert_eq!(TaskCategory::parse(" Work "), Some(TaskCategory::Work));
        assert_eq!(TaskCategory::parse("casa"), Some(TaskCategory::Home));
        assert_eq!(
            TaskCategory::parse("NEGOCIOS"),
            Some(TaskCategory::Business)
        );
        assert_eq!(TaskCategory::parse("errands"), None);
    }

    #[test]
    fn timestamp_format_matches_iso_millis() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(instant), "2024-03-09T07:05:01.000Z");
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let err = Task::new(TaskId(1), NewTask::new("   ", "", TaskCategory::Home)).unwrap_err();
        assert_eq!(err, TaskValidationError::EmptyTitle);
        assert!(!NewTask::default().is_submittable());
    }

    #[test]
    fn toggled_only_flips_completed() {
        let task =
            Task::new(TaskId(7), NewTask::new("Buy milk", "2L", TaskCategory::Work)).unwrap();
        let flipped = task.toggled();
        assert!(flipped.completed);
        assert_eq!(flipped.id, task.id);
        assert_eq!(flipped.title, task.title);
        assert_eq!(flipped.created_at, task.created_at);
        assert_eq!(flipped.toggled(), task);
    }
}
