//! In-process store for callers that do not need durability.

use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use crate::state::ContestState;

use super::{ContestStore, PersistError, PersistResult};

#[derive(Debug, Default)]
struct Inner {
    states: HashMap<String, ContestState>,
    saves: usize,
    fail_saves: bool,
}

/// Keeps the latest state per contest in memory.
///
/// Clones share storage, so a caller can keep one clone to inspect what an
/// update cycle wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().map(|inner| inner.saves).unwrap_or(0)
    }

    /// Latest saved state for `contest`.
    pub fn get(&self, contest: &str) -> Option<ContestState> {
        self.lock().ok().and_then(|inner| inner.states.get(contest).cloned())
    }

    /// Seeds state as if a previous process had saved it.
    pub fn put(&self, state: ContestState) {
        if let Ok(mut inner) = self.lock() {
            inner.states.insert(state.name.clone(), state);
        }
    }

    /// Makes subsequent saves fail, for exercising error reporting.
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_saves = fail;
        }
    }

    fn lock(&self) -> PersistResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PersistError::Message("memory store lock poisoned".to_string()))
    }
}

impl ContestStore for MemoryStore {
    fn load(&self, contest: &str) -> PersistResult<Option<ContestState>> {
        Ok(self.lock()?.states.get(contest).cloned())
    }

    fn save(&mut self, state: &ContestState) -> PersistResult<()> {
        let mut inner = self.lock()?;
        if inner.fail_saves {
            return Err(PersistError::Message("save rejected".to_string()));
        }
        inner.states.insert(state.name.clone(), state.clone());
        inner.saves += 1;
        Ok(())
    }
}
