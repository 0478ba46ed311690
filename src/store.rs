use std::path::PathBuf;

use crate::error::Result;
use crate::state::{AppState, HISTORY_LIMIT};

/// JSON-file persistence for the whole application state. The full blob is
/// written on every save, replacing the prior value.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(StateStore { path })
    }

    /// Load the last saved state. Absent or corrupt data silently falls back
    /// to the default state; startup must never fail on a bad file.
    pub fn load(&self) -> AppState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return AppState::default(),
        };

        match serde_json::from_str::<AppState>(&content) {
            Ok(mut state) => {
                // Re-establish the history invariant on stored blobs that
                // predate it or were edited externally.
                state.history.truncate(HISTORY_LIMIT);
                state
            }
            Err(_) => AppState::default(),
        }
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
