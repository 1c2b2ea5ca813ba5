//! Store abstraction for contest state.

/// In-memory store.
pub mod memory;
/// SQLite store.
pub mod sqlite;

use std::sync::Arc;

use log::warn;
use tokio::sync::Mutex;

use crate::state::{ContestState, StateError};

/// Failure to read or write stored state.
#[derive(Debug)]
pub enum PersistError {
    /// Database error.
    Sqlite(rusqlite::Error),
    /// Payload could not be encoded or decoded.
    Serde(serde_json::Error),
    /// Payload decoded but describes an invalid contest.
    State(StateError),
    /// Anything else, e.g. a failed blocking task.
    Message(String),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Serde(err) => write!(f, "serde: {err}"),
            Self::State(err) => write!(f, "invalid state: {err:?}"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<StateError> for PersistError {
    fn from(value: StateError) -> Self {
        Self::State(value)
    }
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Durable home of serialized contest state.
pub trait ContestStore: Send {
    /// Latest state saved for `contest`, `None` on first run.
    fn load(&self, contest: &str) -> PersistResult<Option<ContestState>>;
    /// Records `state` as the newest state of its contest.
    fn save(&mut self, state: &ContestState) -> PersistResult<()>;

    /// Drops saved history for `contest` beyond the newest `keep` entries.
    ///
    /// Returns the number of entries removed. Stores without history keep
    /// the default.
    fn compact(&mut self, _contest: &str, _keep: usize) -> PersistResult<usize> {
        Ok(0)
    }
}

/// Store shared between cycles; the lock is held for a whole save.
pub type SharedStore = Arc<Mutex<Box<dyn ContestStore>>>;

/// Wraps a boxed store for use across update cycles.
pub fn shared(store: Box<dyn ContestStore>) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Saves `state` on the blocking pool while holding the store lock.
///
/// With `keep_history` set, older entries for the contest are compacted
/// under the same lock. A failed compaction is logged; the save stands.
pub async fn save_state(
    store: &SharedStore,
    state: ContestState,
    keep_history: Option<usize>,
) -> PersistResult<()> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut store = store.blocking_lock();
        store.save(&state)?;
        if let Some(keep) = keep_history {
            if let Err(err) = store.compact(&state.name, keep.max(1)) {
                warn!("could not compact history for {}: {err}", state.name);
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))?
}
