//! Contest participants and per-cycle reconciliation.

use hashbrown::HashSet;

use crate::{
    film::{Film, FilmSnapshot},
    types::{Place, SourceRef},
};

/// A contest participant and their latest observed list.
#[derive(Debug, Clone)]
pub struct Member {
    /// Stable display name; unique within a contest.
    pub name: String,
    /// Profile page.
    pub profile_url: SourceRef,
    /// List the snapshot is fetched from.
    pub contest_url: SourceRef,
    snapshot: FilmSnapshot,
    rank: Option<Place>,
    films_since_last_update: HashSet<Film>,
}

impl Member {
    /// Creates a member with a fresh empty snapshot of `contest_url`.
    pub fn new(
        name: impl Into<String>,
        profile_url: impl Into<SourceRef>,
        contest_url: impl Into<SourceRef>,
    ) -> Self {
        let contest_url = contest_url.into();
        Self {
            name: name.into(),
            profile_url: profile_url.into(),
            snapshot: FilmSnapshot::empty(contest_url.clone()),
            contest_url,
            rank: None,
            films_since_last_update: HashSet::new(),
        }
    }

    /// Replaces the initial snapshot, e.g. from seeded or stored state.
    pub fn with_snapshot(mut self, snapshot: FilmSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &FilmSnapshot {
        &self.snapshot
    }

    /// Place from the most recent ranking; `None` before the first one.
    pub fn rank(&self) -> Option<Place> {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, place: Place) {
        self.rank = Some(place);
    }

    /// Films that appeared in the last cycle; empty if that cycle's fetch
    /// failed.
    pub fn films_since_last_update(&self) -> &HashSet<Film> {
        &self.films_since_last_update
    }

    /// Number of films in the current snapshot.
    pub fn film_count(&self) -> usize {
        self.snapshot.len()
    }

    /// Total known runtime of the current snapshot.
    pub fn watchtime_minutes(&self) -> u64 {
        self.snapshot.watchtime()
    }

    /// Ranking key, compared descending.
    pub fn score(&self) -> (usize, u64) {
        (self.film_count(), self.watchtime_minutes())
    }

    /// Installs `next` as the current snapshot and records the forward delta.
    ///
    /// Returns whether the snapshot differs from the previous one. Removals
    /// count as a change even though they never show up in the delta.
    pub fn reconcile(&mut self, next: FilmSnapshot) -> bool {
        let previous = std::mem::replace(&mut self.snapshot, next);
        self.films_since_last_update = self.snapshot.difference(&previous);
        self.snapshot != previous
    }

    /// Keeps the snapshot as is but reports nothing new for this cycle.
    pub(crate) fn skip_cycle(&mut self) {
        self.films_since_last_update.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_members_do_not_share_snapshots() {
        let mut a = Member::new("a", "/a/", "/a/list/");
        let b = Member::new("b", "/b/", "/b/list/");
        a.reconcile(FilmSnapshot::from_films("/a/list/", [Film::new("Heat", "/film/heat/")]));
        assert_eq!(a.film_count(), 1);
        assert_eq!(b.film_count(), 0);
        assert_eq!(b.snapshot().url(), "/b/list/");
    }

    #[test]
    fn delta_is_subset_of_snapshot() {
        let mut m = Member::new("a", "/a/", "/a/list/");
        m.reconcile(FilmSnapshot::from_films(
            "/a/list/",
            [Film::new("Heat", "/film/heat/"), Film::new("Ran", "/film/ran/")],
        ));
        assert!(m.films_since_last_update().is_subset(m.snapshot().films()));
        assert_eq!(m.rank(), None);
    }

    #[test]
    fn skipped_cycle_keeps_snapshot_and_drops_delta() {
        let mut m = Member::new("a", "/a/", "/a/list/");
        m.reconcile(FilmSnapshot::from_films("/a/list/", [Film::new("Heat", "/film/heat/")]));
        let before = m.snapshot().clone();

        m.skip_cycle();
        assert_eq!(m.snapshot(), &before);
        assert!(m.films_since_last_update().is_empty());
    }
}
