use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::error::{LoadError, DEFAULT_LOAD_ERROR};
use crate::models::Task;
use crate::store::Store;
use crate::tasks::TaskAction;

pub const SAMPLE_TEXTS: [&str; 3] = ["Learn React Native", "Build a Todo App", "Master Redux"];

#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real delay on the tokio clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Completes immediately regardless of the requested delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTimer;

#[async_trait]
impl Timer for ImmediateTimer {
    async fn sleep(&self, _duration: Duration) {}
}

#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Task>, LoadError>;
}

/// Stand-in data source: waits `delay`, then yields the fixed sample list.
pub struct SampleSource<T: Timer> {
    timer: T,
    delay: Duration,
}

impl<T: Timer> SampleSource<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self { timer, delay }
    }
}

#[async_trait]
impl<T: Timer> TaskSource for SampleSource<T> {
    async fn fetch(&self) -> Result<Vec<Task>, LoadError> {
        self.timer.sleep(self.delay).await;
        Ok(sample_tasks())
    }
}

pub fn sample_tasks() -> Vec<Task> {
    let now = Utc::now().timestamp();
    SAMPLE_TEXTS
        .iter()
        .enumerate()
        .map(|(index, text)| Task {
            id: (index + 1).to_string(),
            text: text.to_string(),
            completed: false,
            created_at: now,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Succeeded(usize),
    Failed(String),
}

/// Runs one load as three dispatches: pending, then succeeded or failed.
pub async fn load_sample(store: &Store, source: &dyn TaskSource) -> LoadOutcome {
    store.dispatch(TaskAction::LoadPending);
    log::info!("sample load started");

    match source.fetch().await {
        Ok(items) => {
            let snapshot = store.dispatch(TaskAction::LoadSucceeded { items });
            let count = snapshot.tasks.items.len();
            log::info!("sample load succeeded count={count}");
            LoadOutcome::Succeeded(count)
        }
        Err(error) => {
            let message = error.to_string();
            log::warn!("sample load failed error={message}");
            let snapshot = store.dispatch(TaskAction::LoadFailed { message });
            LoadOutcome::Failed(
                snapshot
                    .tasks
                    .load_error
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOAD_ERROR.to_string()),
            )
        }
    }
}

/// Spawns [`load_sample`] on the current tokio runtime.
///
/// Overlapping loads are not cancelled; whichever completes last wins.
pub fn spawn_load_sample(store: Store, source: Arc<dyn TaskSource>) -> JoinHandle<LoadOutcome> {
    tokio::spawn(async move { load_sample(&store, &*source).await })
}
