//! Fact loading
//!
//! The engine never reads facts itself; a [`FactLoader`] hands it one
//! consistent [`FactSnapshot`]. Loader failures propagate as errors and are
//! never mistaken for "nothing decided yet".

use crate::error::{Result, ScoringError};
use crate::types::FactSnapshot;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::info;

/// Source of fact snapshots
pub trait FactLoader: Send + Sync {
    fn load(&self) -> Result<FactSnapshot>;
}

/// Reads a snapshot JSON document from disk
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time in milliseconds, used when the document carries no version
    fn modified_version(&self) -> Result<u64> {
        let modified = fs::metadata(&self.path)?.modified()?;
        let since_epoch = modified
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ScoringError::Loader(format!("{}: {}", self.path.display(), e)))?;
        Ok(since_epoch.as_millis() as u64)
    }
}

impl FactLoader for JsonFileLoader {
    fn load(&self) -> Result<FactSnapshot> {
        let content = fs::read_to_string(&self.path)?;
        let mut snapshot: FactSnapshot = serde_json::from_str(&content)?;
        if snapshot.version == 0 {
            snapshot.version = self.modified_version()?;
        }

        info!(
            "Loaded snapshot v{} from {}: {} fixtures, {} picks, {} submissions, {} leagues",
            snapshot.version,
            self.path.display(),
            snapshot.fixtures.len(),
            snapshot.picks.len(),
            snapshot.submissions.len(),
            snapshot.leagues.len()
        );
        Ok(snapshot)
    }
}

/// Serves a snapshot already held in memory
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    snapshot: FactSnapshot,
}

impl InMemoryLoader {
    pub fn new(snapshot: FactSnapshot) -> Self {
        Self { snapshot }
    }
}

impl FactLoader for InMemoryLoader {
    fn load(&self) -> Result<FactSnapshot> {
        Ok(self.snapshot.clone())
    }
}
