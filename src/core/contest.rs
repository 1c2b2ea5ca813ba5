//! The contest aggregate and its reconciliation cycle.

use chrono::NaiveDateTime;
use hashbrown::HashMap;
use log::warn;

use crate::{
    config::ContestConfig,
    engine::traits::{FetchError, UpdateObserver},
    film::FilmSnapshot,
    member::Member,
    persist::{ContestStore, PersistResult},
    render::{self, StandingEntry},
    runtime::events::ContestEvent,
    state::{ContestState, MemberState, StateError, validate_names},
};

use super::ranking::rank_members;

/// A member left stale for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    /// Member name.
    pub name: String,
    /// Why the fetch failed.
    pub error: FetchError,
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// True when at least one member's snapshot changed.
    pub changed: bool,
    /// Members whose fetch failed, in member order.
    pub skipped: Vec<SkippedMember>,
}

/// Members in rank order plus the last rendered standings.
#[derive(Debug, Clone)]
pub struct Contest {
    name: String,
    members: Vec<Member>,
    standings_text: String,
    last_update: Option<NaiveDateTime>,
}

impl Contest {
    /// Creates a contest, rejecting blank or duplicate names.
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Result<Self, StateError> {
        let name = name.into();
        validate_names(&name, members.iter().map(|m| m.name.as_str()))?;
        Ok(Self {
            name,
            members,
            standings_text: String::new(),
            last_update: None,
        })
    }

    /// Builds the configured contest, seeding snapshots where given.
    pub fn from_config(config: &ContestConfig) -> Result<Self, StateError> {
        let members = config
            .members
            .iter()
            .map(|m| {
                let member = Member::new(&m.name, &m.profile_url, &m.contest_url);
                match &m.list {
                    Some(list) => member.with_snapshot(FilmSnapshot::from(list.clone())),
                    None => member,
                }
            })
            .collect();
        Self::new(&config.name, members)
    }

    /// Rebuilds a contest from stored state, keeping stored member order.
    pub fn from_state(state: ContestState) -> Result<Self, StateError> {
        state.validate()?;
        let members = state.members.into_iter().map(Member::from).collect();
        Self::new(state.name, members)
    }

    /// Loads stored state for the configured contest.
    ///
    /// Missing, unreadable or invalid stored state falls back to the
    /// configuration. Only an invalid configuration is an error.
    pub fn restore(config: &ContestConfig, store: &dyn ContestStore) -> Result<Self, StateError> {
        let stored: PersistResult<Option<Self>> = match store.load(&config.name) {
            Ok(Some(state)) if state.name != config.name => Err(StateError::NameMismatch {
                expected: config.name.clone(),
                found: state.name,
            }
            .into()),
            Ok(Some(state)) => Self::from_state(state).map(Some).map_err(Into::into),
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };

        match stored {
            Ok(Some(contest)) => Ok(contest),
            Ok(None) => Self::from_config(config),
            Err(err) => {
                warn!("ignoring stored state for {}: {err}", config.name);
                Self::from_config(config)
            }
        }
    }

    /// Serializable state, members in rank order.
    pub fn export_state(&self) -> ContestState {
        ContestState {
            name: self.name.clone(),
            members: self.members.iter().map(MemberState::from).collect(),
        }
    }

    /// Contest name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in rank order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Looks a member up by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Standings rendered by the last cycle; empty before the first one.
    pub fn standings_text(&self) -> &str {
        &self.standings_text
    }

    /// When standings were last rendered.
    pub fn last_update(&self) -> Option<NaiveDateTime> {
        self.last_update
    }

    /// Applies one cycle's fetch results, then ranks and renders.
    ///
    /// Members without a result are left as they were. A member whose fetch
    /// failed keeps its snapshot and rank but reports no new films. Nothing
    /// is touched
    /// until every result is in hand, so the member list is never observed
    /// half-updated.
    pub fn apply_cycle(
        &mut self,
        fetched: impl IntoIterator<Item = (String, Result<FilmSnapshot, FetchError>)>,
        at: NaiveDateTime,
        observer: &dyn UpdateObserver,
    ) -> CycleOutcome {
        let mut results: HashMap<String, Result<FilmSnapshot, FetchError>> =
            fetched.into_iter().collect();
        let mut outcome = CycleOutcome::default();

        for member in &mut self.members {
            match results.remove(&member.name) {
                Some(Ok(snapshot)) => {
                    let changed = member.reconcile(snapshot);
                    outcome.changed |= changed;
                    observer.notify(ContestEvent::MemberReconciled {
                        member: member.name.clone(),
                        changed,
                        new_films: member.films_since_last_update().len(),
                    });
                }
                Some(Err(error)) => {
                    member.skip_cycle();
                    observer.notify(ContestEvent::FetchFailed {
                        member: member.name.clone(),
                        error: error.to_string(),
                    });
                    outcome.skipped.push(SkippedMember {
                        name: member.name.clone(),
                        error,
                    });
                }
                None => {}
            }
        }

        self.rank();
        self.render_standings(at);

        observer.notify(ContestEvent::CycleComplete {
            changed: outcome.changed,
            skipped: outcome.skipped.len(),
        });
        outcome
    }

    /// Re-sorts members and assigns places.
    pub fn rank(&mut self) {
        rank_members(&mut self.members);
    }

    /// Rebuilds the standings text stamped with `at`.
    pub fn render_standings(&mut self, at: NaiveDateTime) {
        self.standings_text = render::standings_text(&self.standings(), at);
        self.last_update = Some(at);
    }

    /// Ranked rows for external renderers.
    pub fn standings(&self) -> Vec<StandingEntry> {
        self.members
            .iter()
            .enumerate()
            .map(|(idx, m)| StandingEntry::from_member(m, idx as u32 + 1))
            .collect()
    }
}
