use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub type Timestamp = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct TaskCollectionState {
    pub items: Vec<Task>,
    #[serde(default)]
    pub load_status: LoadStatus,
    #[serde(default)]
    pub load_error: Option<String>,
}

impl TaskCollectionState {
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Tasks not yet completed, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().filter(|task| !task.completed)
    }

    /// Completed tasks, in insertion order.
    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().filter(|task| task.completed)
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.completed().count();
        TaskCounts {
            total: self.items.len(),
            active: self.items.len() - completed,
            completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct SettingsState {
    #[serde(default)]
    pub dark_mode: bool,
}

/// One immutable snapshot of the whole store.
///
/// Branches are reference counted so a dispatch that only touches one
/// sub-state hands the other one over untouched.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct RootState {
    pub tasks: Arc<TaskCollectionState>,
    pub settings: Arc<SettingsState>,
}

impl RootState {
    pub fn new(tasks: TaskCollectionState, settings: SettingsState) -> Self {
        Self {
            tasks: Arc::new(tasks),
            settings: Arc::new(settings),
        }
    }
}
