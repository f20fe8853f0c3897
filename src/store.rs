use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::SavedPlan;

/// Saved-plans store backed by a single JSON file, the desktop analog of
/// the app's scoped browser storage.
///
/// The file holds a mapping from plan id to saved plan. Growth is
/// unbounded on purpose; there is no eviction policy for saved plans.
pub struct SavedPlansStore {
    path: PathBuf,
}

impl SavedPlansStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all saved plans. A missing file is an empty store; a malformed
    /// file is logged and treated as empty rather than crashing the caller.
    pub fn load(&self) -> HashMap<String, SavedPlan> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(plans) => plans,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "malformed saved-plans store, treating as empty");
                HashMap::new()
            }
        }
    }

    /// Insert or overwrite a saved plan under its plan id.
    pub fn insert(&self, plan_id: &str, plan: &SavedPlan) -> Result<()> {
        let mut plans = self.load();
        plans.insert(plan_id.to_string(), plan.clone());
        self.persist(&plans)
    }

    /// Remove a saved plan, reporting whether it was present.
    pub fn remove(&self, plan_id: &str) -> Result<bool> {
        let mut plans = self.load();
        let removed = plans.remove(plan_id).is_some();
        if removed {
            self.persist(&plans)?;
        }
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.persist(&HashMap::new())
    }

    fn persist(&self, plans: &HashMap<String, SavedPlan>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(plans)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
