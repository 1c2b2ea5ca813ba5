//! Update cycle event payloads.

/// Events emitted while a contest refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContestEvent {
    /// A member's list fetch was issued.
    FetchStarted {
        /// Member name.
        member: String,
    },
    /// A member's list could not be read; the member is skipped this cycle.
    FetchFailed {
        /// Member name.
        member: String,
        /// Rendered fetch error.
        error: String,
    },
    /// A member's snapshot was replaced.
    MemberReconciled {
        /// Member name.
        member: String,
        /// Whether the snapshot differs from the previous one.
        changed: bool,
        /// Size of the forward delta.
        new_films: usize,
    },
    /// Ranking and standings are up to date.
    CycleComplete {
        /// Whether any member changed.
        changed: bool,
        /// Members skipped after fetch failures.
        skipped: usize,
    },
    /// Contest state reached the store.
    Persisted,
    /// Saving contest state failed; in-memory state is still current.
    PersistFailed {
        /// Rendered persistence error.
        error: String,
    },
}
