//! Presentation state for the four-screen flow.
//!
//! # Responsibility
//! - Track which screen is shown and the pending creation draft.
//! - Route user actions to `TaskStore` and pick the follow-up screen.
//!
//! # Invariants
//! - Details hold a task id, never a task copy; the task is resolved
//!   against the store on every read.
//! - Deleting the task shown in details always leaves the details screen.

use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{StoreResult, TaskStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    Add,
    List,
    Details(TaskId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    screen: Screen,
    /// Creation form contents, kept across failed submissions.
    pub draft: NewTask,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    pub fn open_add(&mut self) {
        self.screen = Screen::Add;
    }

    pub fn open_list(&mut self) {
        self.screen = Screen::List;
    }

    pub fn open_details(&mut self, id: TaskId) {
        self.screen = Screen::Details(id);
    }

    /// Header back button: details return to the list, everything else home.
    pub fn back(&mut self) {
        self.screen = match self.screen {
            Screen::Details(_) => Screen::List,
            Screen::Home | Screen::Add | Screen::List => Screen::Home,
        };
    }

    /// Task currently shown in details, if it still exists.
    pub fn selected_task<'s, R: TaskRepository>(
        &self,
        store: &'s TaskStore<R>,
    ) -> Option<&'s Task> {
        match self.screen {
            Screen::Details(id) => store.get(id),
            _ => None,
        }
    }

    /// Adds the draft; on success clears it and shows the list.
    ///
    /// On failure the draft and screen are left as they were.
    pub fn submit_draft<R: TaskRepository>(
        &mut self,
        store: &mut TaskStore<R>,
    ) -> StoreResult<Task> {
        let task = store.add(self.draft.clone())?;
        self.draft = NewTask::default();
        self.screen = Screen::List;
        Ok(task)
    }

    /// Deletes a task and leaves details if they showed it.
    pub fn delete_task<R: TaskRepository>(
        &mut self,
        store: &mut TaskStore<R>,
        id: TaskId,
    ) -> StoreResult<Task> {
        let removed = store.delete(id)?;
        if self.screen == Screen::Details(id) {
            self.screen = Screen::List;
        }
        Ok(removed)
    }
}
