use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::models::RootState;
use crate::settings::{self, SettingsAction};
use crate::tasks::{self, TaskAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Tasks(TaskAction),
    Settings(SettingsAction),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Tasks(action) => action.kind(),
            Action::Settings(action) => action.kind(),
        }
    }
}

impl From<TaskAction> for Action {
    fn from(value: TaskAction) -> Self {
        Action::Tasks(value)
    }
}

impl From<SettingsAction> for Action {
    fn from(value: SettingsAction) -> Self {
        Action::Settings(value)
    }
}

/// Routes `action` to the sub-state that owns it. The other branch is shared.
pub fn reduce(state: &RootState, action: &Action) -> RootState {
    match action {
        Action::Tasks(action) => RootState {
            tasks: tasks::reduce(&state.tasks, action),
            settings: Arc::clone(&state.settings),
        },
        Action::Settings(action) => RootState {
            tasks: Arc::clone(&state.tasks),
            settings: settings::reduce(&state.settings, action),
        },
    }
}

type Listener = Arc<dyn Fn(&RootState) + Send + Sync>;

/// Handle to one task list store. Clones address the same store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreData>>,
}

struct StoreData {
    state: RootState,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    // Snapshots waiting to be delivered while a notification pass runs.
    pending: VecDeque<RootState>,
    notifying: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(RootState::default())
    }

    pub fn with_state(state: RootState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreData {
                state,
                listeners: Vec::new(),
                next_listener_id: 0,
                pending: VecDeque::new(),
                notifying: false,
            })),
        }
    }

    pub fn get_state(&self) -> RootState {
        self.lock().state.clone()
    }

    /// Reduces `action` into a new snapshot, swaps it in, then notifies every
    /// listener with that snapshot.
    ///
    /// Listeners run after the lock is released, so they may dispatch or
    /// unsubscribe themselves. A dispatch made from inside a listener returns
    /// its snapshot at once; the snapshot is queued and delivered after the
    /// current one has reached every listener, so listeners always see
    /// snapshots in dispatch order.
    pub fn dispatch(&self, action: impl Into<Action>) -> RootState {
        let action = action.into();
        let (snapshot, deliver) = {
            let mut guard = self.lock();
            let next = reduce(&guard.state, &action);
            guard.state = next.clone();
            guard.pending.push_back(next.clone());
            let deliver = !guard.notifying;
            guard.notifying = true;
            (next, deliver)
        };

        let counts = snapshot.tasks.counts();
        log::debug!(
            "dispatch kind={} total={} active={} completed={} dark_mode={}",
            action.kind(),
            counts.total,
            counts.active,
            counts.completed,
            snapshot.settings.dark_mode
        );

        if deliver {
            self.drain_notifications();
        }
        snapshot
    }

    fn drain_notifications(&self) {
        let _pass = NotifyPass { store: self };
        loop {
            let (next, listeners) = {
                let mut guard = self.lock();
                let Some(next) = guard.pending.pop_front() else {
                    guard.notifying = false;
                    return;
                };
                let listeners: Vec<Listener> = guard
                    .listeners
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect();
                (next, listeners)
            };
            for listener in listeners {
                listener(&next);
            }
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RootState) + Send + Sync + 'static,
    {
        let mut guard = self.lock();
        let id = guard.next_listener_id;
        guard.next_listener_id += 1;
        guard.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Ends a notification pass even when a listener panics.
struct NotifyPass<'a> {
    store: &'a Store,
}

impl Drop for NotifyPass<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut guard = self.store.lock();
            guard.notifying = false;
            guard.pending.clear();
        }
    }
}

/// Returned by [`Store::subscribe`]. Dropping it keeps the listener registered.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<Mutex<StoreData>>,
}

impl Subscription {
    /// Removes the listener. Returns `false` if it was already removed or the
    /// store is gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };
        let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = guard.listeners.len();
        guard.listeners.retain(|(id, _)| *id != self.id);
        guard.listeners.len() != before
    }
}
