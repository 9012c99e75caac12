use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::Result;

use super::limiter::UsageState;

/// Persistence seam for insight usage counters.
///
/// Implementations hold at most one state blob. A missing blob is `Ok(None)`,
/// not an error, so a fresh install starts counting from zero.
pub trait UsageStore: Send + Sync {
    fn load(&self) -> Result<Option<UsageState>>;
    fn save(&self, state: &UsageState) -> Result<()>;
}

/// Usage counters as a pretty-printed JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UsageStore for JsonFileStore {
    fn load(&self) -> Result<Option<UsageState>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_str(&raw)?;
        Ok(Some(state))
    }

    fn save(&self, state: &UsageState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<UsageState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: UsageState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl UsageStore for MemoryStore {
    fn load(&self) -> Result<Option<UsageState>> {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, state: &UsageState) -> Result<()> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(state.clone());
        Ok(())
    }
}
