use std::sync::Arc;

use crate::events::SETTINGS_TOGGLE_DARK_MODE;
use crate::models::SettingsState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    ToggleDarkMode,
}

impl SettingsAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToggleDarkMode => SETTINGS_TOGGLE_DARK_MODE,
        }
    }
}

pub fn reduce(state: &Arc<SettingsState>, action: &SettingsAction) -> Arc<SettingsState> {
    match action {
        SettingsAction::ToggleDarkMode => Arc::new(SettingsState {
            dark_mode: !state.dark_mode,
        }),
    }
}
