//! SQLite-backed contest state store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use crate::state::{ContestState, STATE_FORMAT_VERSION, StateEnvelope};

use super::{ContestStore, PersistError, PersistResult};

/// SQLite implementation of [`crate::persist::ContestStore`].
///
/// Every save appends a row; loads read the newest row for a contest.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Writes `state` as a new row.
    pub fn write_state(&mut self, state: &ContestState) -> PersistResult<()> {
        let payload = serde_json::to_vec(&StateEnvelope::new(state.clone()))?;
        self.conn.execute(
            "INSERT INTO contest_states(contest, ts_ms, payload) VALUES (?1, ?2, ?3)",
            params![state.name, now_ms() as i64, payload],
        )?;
        debug!("stored state for {} ({} members)", state.name, state.members.len());
        Ok(())
    }

    /// Loads the newest state saved for `contest`.
    pub fn load_latest(&self, contest: &str) -> PersistResult<Option<ContestState>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM contest_states WHERE contest = ?1 ORDER BY id DESC LIMIT 1",
                params![contest],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        decode_state_payload(&payload).map(Some)
    }

    /// Deletes all but the newest `keep` rows for `contest`.
    pub fn prune(&mut self, contest: &str, keep: usize) -> PersistResult<usize> {
        let count = self.conn.execute(
            "DELETE FROM contest_states WHERE contest = ?1 AND id NOT IN (
                SELECT id FROM contest_states WHERE contest = ?1 ORDER BY id DESC LIMIT ?2
            )",
            params![contest, keep as i64],
        )?;
        Ok(count)
    }

    /// Number of stored rows for `contest`.
    pub fn history_len(&self, contest: &str) -> PersistResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM contest_states WHERE contest = ?1",
            params![contest],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Stores a raw payload, bypassing encoding.
    pub fn write_raw(&mut self, contest: &str, payload: &[u8]) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO contest_states(contest, ts_ms, payload) VALUES (?1, ?2, ?3)",
            params![contest, now_ms() as i64, payload],
        )?;
        Ok(())
    }
}

impl ContestStore for SqliteStore {
    fn load(&self, contest: &str) -> PersistResult<Option<ContestState>> {
        self.load_latest(contest)
    }

    fn save(&mut self, state: &ContestState) -> PersistResult<()> {
        self.write_state(state)
    }

    fn compact(&mut self, contest: &str, keep: usize) -> PersistResult<usize> {
        let removed = self.prune(contest, keep)?;
        if removed > 0 {
            debug!("pruned {removed} old states for {contest}");
        }
        Ok(removed)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn decode_state_payload(payload: &[u8]) -> PersistResult<ContestState> {
    if let Ok(envelope) = serde_json::from_slice::<StateEnvelope>(payload) {
        if envelope.format_version != STATE_FORMAT_VERSION {
            return Err(PersistError::Message(format!(
                "unsupported state format version: {}",
                envelope.format_version
            )));
        }
        return Ok(envelope.state);
    }

    // Bare payloads in the plain `{name, members}` shape are accepted too.
    Ok(serde_json::from_slice::<ContestState>(payload)?)
}
