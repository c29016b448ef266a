use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::DEFAULT_LOAD_ERROR;
use crate::events::{
    TASKS_ADD, TASKS_CLEAR_ALL, TASKS_CLEAR_COMPLETED, TASKS_EDIT, TASKS_LOAD_FAILED,
    TASKS_LOAD_PENDING, TASKS_LOAD_SUCCEEDED, TASKS_REMOVE, TASKS_TOGGLE,
};
use crate::models::{LoadStatus, Task, TaskCollectionState, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Add {
        id: String,
        text: String,
        created_at: Timestamp,
    },
    Toggle {
        id: String,
    },
    Remove {
        id: String,
    },
    Edit {
        id: String,
        text: String,
    },
    ClearCompleted,
    ClearAll,
    LoadPending,
    LoadSucceeded {
        items: Vec<Task>,
    },
    LoadFailed {
        message: String,
    },
}

/// Trims user input, returning `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl TaskAction {
    /// Builds an add action with a fresh id and the current time.
    ///
    /// Returns `None` for blank input.
    pub fn add(text: &str) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self::Add {
            id: Uuid::new_v4().to_string(),
            text,
            created_at: Utc::now().timestamp(),
        })
    }

    /// Returns `None` for blank input.
    pub fn edit(id: impl Into<String>, text: &str) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self::Edit {
            id: id.into(),
            text,
        })
    }

    pub fn toggle(id: impl Into<String>) -> Self {
        Self::Toggle { id: id.into() }
    }

    pub fn remove(id: impl Into<String>) -> Self {
        Self::Remove { id: id.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => TASKS_ADD,
            Self::Toggle { .. } => TASKS_TOGGLE,
            Self::Remove { .. } => TASKS_REMOVE,
            Self::Edit { .. } => TASKS_EDIT,
            Self::ClearCompleted => TASKS_CLEAR_COMPLETED,
            Self::ClearAll => TASKS_CLEAR_ALL,
            Self::LoadPending => TASKS_LOAD_PENDING,
            Self::LoadSucceeded { .. } => TASKS_LOAD_SUCCEEDED,
            Self::LoadFailed { .. } => TASKS_LOAD_FAILED,
        }
    }
}

/// Applies `action` to `state` and returns the next state.
///
/// The input is never modified. When the action changes nothing the same
/// `Arc` is returned, so callers can detect no-ops with `Arc::ptr_eq`.
pub fn reduce(state: &Arc<TaskCollectionState>, action: &TaskAction) -> Arc<TaskCollectionState> {
    match action {
        TaskAction::Add {
            id,
            text,
            created_at,
        } => {
            if text.trim().is_empty() || state.contains(id) {
                return Arc::clone(state);
            }
            let mut next = TaskCollectionState::clone(state);
            next.items.push(Task {
                id: id.clone(),
                text: text.clone(),
                completed: false,
                created_at: *created_at,
            });
            Arc::new(next)
        }
        TaskAction::Toggle { id } => {
            update_task(state, id, |task| task.completed = !task.completed)
        }
        TaskAction::Edit { id, text } => {
            if text.trim().is_empty() {
                return Arc::clone(state);
            }
            update_task(state, id, |task| task.text = text.clone())
        }
        TaskAction::Remove { id } => {
            if !state.contains(id) {
                return Arc::clone(state);
            }
            retain_tasks(state, |task| task.id != *id)
        }
        TaskAction::ClearCompleted => {
            if state.completed().next().is_none() {
                return Arc::clone(state);
            }
            retain_tasks(state, |task| !task.completed)
        }
        TaskAction::ClearAll => {
            if state.items.is_empty() {
                return Arc::clone(state);
            }
            retain_tasks(state, |_| false)
        }
        TaskAction::LoadPending => Arc::new(TaskCollectionState {
            items: state.items.clone(),
            load_status: LoadStatus::Loading,
            load_error: None,
        }),
        TaskAction::LoadSucceeded { items } => Arc::new(TaskCollectionState {
            items: dedupe_by_id(items),
            load_status: LoadStatus::Succeeded,
            load_error: None,
        }),
        TaskAction::LoadFailed { message } => {
            let message = normalize_text(message).unwrap_or_else(|| DEFAULT_LOAD_ERROR.to_string());
            Arc::new(TaskCollectionState {
                items: state.items.clone(),
                load_status: LoadStatus::Failed,
                load_error: Some(message),
            })
        }
    }
}

fn update_task(
    state: &Arc<TaskCollectionState>,
    id: &str,
    apply: impl FnOnce(&mut Task),
) -> Arc<TaskCollectionState> {
    let Some(index) = state.items.iter().position(|task| task.id == id) else {
        return Arc::clone(state);
    };
    let mut next = TaskCollectionState::clone(state);
    apply(&mut next.items[index]);
    Arc::new(next)
}

fn retain_tasks(
    state: &Arc<TaskCollectionState>,
    keep: impl Fn(&Task) -> bool,
) -> Arc<TaskCollectionState> {
    Arc::new(TaskCollectionState {
        items: state.items.iter().filter(|task| keep(task)).cloned().collect(),
        load_status: state.load_status,
        load_error: state.load_error.clone(),
    })
}

// Loaded data comes from outside the store; the first occurrence of an id wins.
fn dedupe_by_id(items: &[Task]) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for task in items {
        if seen.insert(task.id.as_str()) {
            out.push(task.clone());
        } else {
            log::warn!("dropping loaded task with duplicate id={}", task.id);
        }
    }
    out
}
