use std::fs;
use std::path::PathBuf;

use traceview_core::error::{Result, ViewerError};
use traceview_core::session::{SessionState, SessionStore};

/// Session persistence as a pretty-printed JSON file.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for JsonSessionStore {
    fn save(&mut self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| ViewerError::Persistence(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&mut self) -> Result<SessionState> {
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| ViewerError::Persistence(e.to_string()))
    }
}
