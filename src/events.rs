// Action type names, used as the `kind` of every dispatched action in logs.

pub const TASKS_ADD: &str = "tasks/add";
pub const TASKS_TOGGLE: &str = "tasks/toggle";
pub const TASKS_REMOVE: &str = "tasks/remove";
pub const TASKS_EDIT: &str = "tasks/edit";
pub const TASKS_CLEAR_COMPLETED: &str = "tasks/clear_completed";
pub const TASKS_CLEAR_ALL: &str = "tasks/clear_all";
pub const TASKS_LOAD_PENDING: &str = "tasks/load_sample/pending";
pub const TASKS_LOAD_SUCCEEDED: &str = "tasks/load_sample/succeeded";
pub const TASKS_LOAD_FAILED: &str = "tasks/load_sample/failed";

pub const SETTINGS_TOGGLE_DARK_MODE: &str = "settings/toggle_dark_mode";
