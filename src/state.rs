//! Serialized contest state and its mapping to the domain model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    film::{Film, FilmSnapshot},
    member::Member,
    types::Minutes,
};

/// Version number for serialized [`StateEnvelope`] payloads.
pub const STATE_FORMAT_VERSION: u16 = 1;

/// Reasons stored or configured state cannot become a contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Contest name is blank.
    EmptyContestName,
    /// A member name is blank.
    EmptyMemberName,
    /// Two members share a name.
    DuplicateMember(String),
    /// Stored state belongs to another contest.
    NameMismatch {
        /// Name that was asked for.
        expected: String,
        /// Name found in the payload.
        found: String,
    },
}

/// Persisted film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmState {
    /// Display title.
    pub title: String,
    /// Canonical film page.
    pub url: String,
    /// Runtime in minutes; `null`, missing, or non-positive means unknown.
    #[serde(default, deserialize_with = "runtime_or_unknown")]
    pub runtime: Option<Minutes>,
    /// Poster artwork reference.
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Persisted list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    /// List the snapshot was read from.
    pub url: String,
    /// Films in the snapshot; duplicates collapse on load.
    #[serde(default)]
    pub films: Vec<FilmState>,
}

/// Persisted member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    /// List the member is ranked on.
    pub contest_url: String,
    /// Profile page.
    pub profile_url: String,
    /// Display name.
    pub name: String,
    /// Last observed snapshot.
    pub list: ListState,
}

/// Persisted contest, members in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestState {
    /// Contest name.
    pub name: String,
    /// Members in rank order.
    pub members: Vec<MemberState>,
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped contest state.
    pub state: ContestState,
}

impl StateEnvelope {
    /// Constructs an envelope using [`STATE_FORMAT_VERSION`].
    pub fn new(state: ContestState) -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION,
            state,
        }
    }
}

fn runtime_or_unknown<'de, D>(deserializer: D) -> Result<Option<Minutes>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| Minutes::try_from(v).ok()).filter(|v| *v > 0))
}

impl From<&Film> for FilmState {
    fn from(film: &Film) -> Self {
        Self {
            title: film.title.clone(),
            url: film.url.clone(),
            runtime: film.runtime_minutes,
            poster_url: film.poster_url.clone(),
        }
    }
}

impl From<FilmState> for Film {
    fn from(state: FilmState) -> Self {
        Film {
            title: state.title,
            url: state.url,
            runtime_minutes: state.runtime,
            poster_url: state.poster_url,
            ..Film::default()
        }
    }
}

impl From<&FilmSnapshot> for ListState {
    fn from(snapshot: &FilmSnapshot) -> Self {
        let mut films: Vec<FilmState> = snapshot.films().iter().map(FilmState::from).collect();
        // Stable output for diffs of the stored payload.
        films.sort_by(|a, b| (&a.title, &a.url).cmp(&(&b.title, &b.url)));
        Self {
            url: snapshot.url().to_string(),
            films,
        }
    }
}

impl From<ListState> for FilmSnapshot {
    fn from(state: ListState) -> Self {
        FilmSnapshot::from_films(state.url, state.films.into_iter().map(Film::from))
    }
}

impl From<&Member> for MemberState {
    fn from(member: &Member) -> Self {
        Self {
            contest_url: member.contest_url.clone(),
            profile_url: member.profile_url.clone(),
            name: member.name.clone(),
            list: ListState::from(member.snapshot()),
        }
    }
}

impl From<MemberState> for Member {
    fn from(state: MemberState) -> Self {
        Member::new(state.name, state.profile_url, state.contest_url)
            .with_snapshot(FilmSnapshot::from(state.list))
    }
}

impl ContestState {
    /// Checks the structural rules a contest relies on.
    pub fn validate(&self) -> Result<(), StateError> {
        validate_names(&self.name, self.members.iter().map(|m| m.name.as_str()))
    }
}

pub(crate) fn validate_names<'a>(
    contest: &str,
    members: impl IntoIterator<Item = &'a str>,
) -> Result<(), StateError> {
    if contest.trim().is_empty() {
        return Err(StateError::EmptyContestName);
    }
    let mut seen = hashbrown::HashSet::new();
    for name in members {
        if name.trim().is_empty() {
            return Err(StateError::EmptyMemberName);
        }
        if !seen.insert(name) {
            return Err(StateError::DuplicateMember(name.to_string()));
        }
    }
    Ok(())
}
