//! Where a list view's page and search survive between sessions.
//!
//! Writes always replace the stored query string; there is no history to
//! push onto. A write is skipped when the projected string already matches.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::entity::EntityKind;
use crate::error::Result;
use crate::paths;

use super::query::NavigationSnapshot;

/// A replace-only store for one view's query string.
pub trait NavigationState: Send + Sync {
    /// Current query string, with or without a leading `?`.
    fn current(&self) -> String;

    fn replace(&self, query: &str);
}

/// Project `snapshot` into `navigation`. Returns whether a write happened.
pub fn sync(navigation: &dyn NavigationState, snapshot: &NavigationSnapshot) -> bool {
    let projected = snapshot.to_query_string();
    let current = navigation.current();
    if current.trim().trim_start_matches('?') == projected {
        return false;
    }

    navigation.replace(&projected);
    true
}

/// Discards everything; the view always starts on page 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNavigation;

impl NavigationState for NoNavigation {
    fn current(&self) -> String {
        String::new()
    }

    fn replace(&self, _query: &str) {}
}

/// In-process navigation state that counts its writes.
#[derive(Debug, Default)]
pub struct MemoryNavigation {
    query: Mutex<String>,
    writes: AtomicUsize,
}

impl MemoryNavigation {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            query: Mutex::new(initial.into()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl NavigationState for MemoryNavigation {
    fn current(&self) -> String {
        self.query.lock().clone()
    }

    fn replace(&self, query: &str) {
        *self.query.lock() = query.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// The last view per record kind, kept in `views.yaml`.
#[derive(Debug, Clone)]
pub struct SavedView {
    path: PathBuf,
    kind: EntityKind,
}

impl SavedView {
    pub fn new(path: impl Into<PathBuf>, kind: EntityKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The saved view for `kind` under the steward home directory.
    pub fn open(kind: EntityKind) -> Self {
        Self::new(paths::views_path(), kind)
    }

    fn load(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            return BTreeMap::new();
        }

        match self.read() {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable saved views");
                BTreeMap::new()
            }
        }
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    fn store(&self, views: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml_ng::to_string(views)?)?;
        Ok(())
    }
}

impl NavigationState for SavedView {
    fn current(&self) -> String {
        self.load().remove(self.kind.as_str()).unwrap_or_default()
    }

    fn replace(&self, query: &str) {
        let mut views = self.load();
        if query.is_empty() {
            views.remove(self.kind.as_str());
        } else {
            views.insert(self.kind.as_str().to_string(), query.to_string());
        }

        if let Err(e) = self.store(&views) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to save view");
        }
    }
}
