//! Standings text and the ranked view handed to external renderers.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    member::Member,
    types::{Place, Rating},
};

/// Timestamp layout used in the standings header.
pub const HEADER_TIME_FORMAT: &str = "%m/%d %H:%M";

/// A film that appeared since the previous update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFilm {
    /// Display title.
    pub title: String,
    /// Canonical film page.
    pub url: String,
    /// Poster artwork, if resolved.
    pub poster_url: Option<String>,
    /// Rating attached to this observation.
    pub rating: Option<Rating>,
}

/// One row of the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Place, shared between tied members.
    pub place: Place,
    /// Member name.
    pub name: String,
    /// Member profile page.
    pub profile_url: String,
    /// Films in the current snapshot.
    pub film_count: usize,
    /// Films added since the previous update.
    pub delta_count: usize,
    /// Total known runtime.
    pub watchtime_minutes: u64,
    /// Newly watched films, ordered by title.
    pub new_films: Vec<NewFilm>,
}

impl StandingEntry {
    /// Builds the row for a ranked member. Unranked members sit at `fallback`.
    pub fn from_member(member: &Member, fallback: Place) -> Self {
        let mut new_films: Vec<NewFilm> = member
            .films_since_last_update()
            .iter()
            .map(|film| NewFilm {
                title: film.title.clone(),
                url: film.url.clone(),
                poster_url: film.poster_url.clone(),
                rating: film.rating,
            })
            .collect();
        new_films.sort_by(|a, b| (&a.title, &a.url).cmp(&(&b.title, &b.url)));

        Self {
            place: member.rank().unwrap_or(fallback),
            name: member.name.clone(),
            profile_url: member.profile_url.clone(),
            film_count: member.film_count(),
            delta_count: new_films.len(),
            watchtime_minutes: member.watchtime_minutes(),
            new_films,
        }
    }
}

/// Medal for the podium, `N.` otherwise.
pub fn place_label(place: Place) -> String {
    match place {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}."),
    }
}

/// Minutes as hours with one decimal.
pub fn hours(minutes: u64) -> String {
    format!("{:.1}h", minutes as f64 / 60.0)
}

/// Renders the multi-line standings report.
pub fn standings_text(entries: &[StandingEntry], at: NaiveDateTime) -> String {
    let mut out = format!("Standings as of {}:\n", at.format(HEADER_TIME_FORMAT));
    for entry in entries {
        let _ = writeln!(
            out,
            "* {} {}: {} (+{}) {}",
            place_label(entry.place),
            entry.name,
            entry.film_count,
            entry.delta_count,
            hours(entry.watchtime_minutes),
        );
    }
    out
}
