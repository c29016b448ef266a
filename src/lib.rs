//! In-memory task list store: an ordered list of short text tasks, a dark
//! mode flag, and a composition root that routes actions and notifies
//! subscribers with immutable snapshots.
//!
//! ```
//! use tasklist::store::Store;
//! use tasklist::tasks::TaskAction;
//!
//! let store = Store::new();
//! let state = store.dispatch(TaskAction::add("Buy milk").unwrap());
//! let id = state.tasks.items[0].id.clone();
//! let state = store.dispatch(TaskAction::toggle(id));
//! assert_eq!(state.tasks.counts().completed, 1);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod logging;
pub mod models;
pub mod settings;
pub mod shell;
pub mod store;
pub mod tasks;

pub use error::{ConfigError, LoadError};
pub use models::{LoadStatus, RootState, SettingsState, Task, TaskCollectionState, TaskCounts};
pub use store::{Action, Store, Subscription};
