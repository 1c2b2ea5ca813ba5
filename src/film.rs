//! Film identity and point-in-time list snapshots.

use std::hash::{Hash, Hasher};

use hashbrown::HashSet;

use crate::types::{Minutes, Rating, SourceRef};

/// One watched movie.
///
/// Identity is `(title, url)`. Year, runtime, poster and rating are carried
/// along but never take part in equality or hashing, so a film resolved with
/// metadata still matches the same film observed without it.
#[derive(Debug, Clone, Default)]
pub struct Film {
    /// Display title.
    pub title: String,
    /// Canonical film page.
    pub url: SourceRef,
    /// Release year, when the list exposes it.
    pub year: Option<u16>,
    /// Runtime, `None` while unknown.
    pub runtime_minutes: Option<Minutes>,
    /// Poster artwork reference.
    pub poster_url: Option<String>,
    /// Rating from the observation that produced this film.
    pub rating: Option<Rating>,
}

impl Film {
    /// Creates a film with no optional details.
    pub fn new(title: impl Into<String>, url: impl Into<SourceRef>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets a known runtime.
    pub fn with_runtime(mut self, minutes: Minutes) -> Self {
        self.runtime_minutes = Some(minutes);
        self
    }

    /// Sets the poster reference.
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }

    /// Sets the observed rating.
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Runtime contribution to watchtime; unknown counts as zero.
    pub fn watchtime(&self) -> Minutes {
        self.runtime_minutes.unwrap_or(0)
    }

    /// Star label for the rating, empty when unrated.
    pub fn rating_label(&self) -> String {
        self.rating.map(Rating::label).unwrap_or_default()
    }

    /// Identity key used for set membership.
    pub fn key(&self) -> (&str, &str) {
        (&self.title, &self.url)
    }
}

impl PartialEq for Film {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Film {}

impl Hash for Film {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.url.hash(state);
    }
}

/// Films observed from one fetch of a list.
#[derive(Debug, Clone, Default)]
pub struct FilmSnapshot {
    url: SourceRef,
    films: HashSet<Film>,
}

impl FilmSnapshot {
    /// Creates an empty snapshot for `url`. Every call allocates its own set.
    pub fn empty(url: impl Into<SourceRef>) -> Self {
        Self {
            url: url.into(),
            films: HashSet::new(),
        }
    }

    /// Builds a snapshot; duplicate identities collapse with the last one kept.
    pub fn from_films(url: impl Into<SourceRef>, films: impl IntoIterator<Item = Film>) -> Self {
        let mut snapshot = Self::empty(url);
        for film in films {
            snapshot.insert(film);
        }
        snapshot
    }

    /// Inserts `film`, replacing any film with the same identity.
    pub fn insert(&mut self, film: Film) {
        self.films.replace(film);
    }

    /// List this snapshot was read from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Films in the snapshot.
    pub fn films(&self) -> &HashSet<Film> {
        &self.films
    }

    /// Looks up the stored film with the same identity as `film`.
    pub fn get(&self, film: &Film) -> Option<&Film> {
        self.films.get(film)
    }

    /// Returns true when a film with this identity is present.
    pub fn contains(&self, film: &Film) -> bool {
        self.films.contains(film)
    }

    /// Number of distinct films.
    pub fn len(&self) -> usize {
        self.films.len()
    }

    /// Returns true when no films were observed.
    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    /// Sum of known runtimes.
    pub fn watchtime(&self) -> u64 {
        self.films.iter().map(|f| u64::from(f.watchtime())).sum()
    }

    /// Films present in `self` but absent from `other`, by identity.
    pub fn difference(&self, other: &FilmSnapshot) -> HashSet<Film> {
        self.films
            .iter()
            .filter(|film| !other.films.contains(*film))
            .cloned()
            .collect()
    }
}

impl PartialEq for FilmSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.films == other.films
    }
}

impl Eq for FilmSnapshot {}
