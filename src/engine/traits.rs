//! Seams to the outside world: list fetching, metadata lookup and progress
//! observation.

use std::{future::Future, time::Duration};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::{
    runtime::events::ContestEvent,
    types::{Minutes, Rating, SourceRef},
};

/// Why a member's list could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure.
    Network(String),
    /// The list was reachable but unreadable.
    Parse(String),
    /// The fetch exceeded its time limit.
    Timeout(Duration),
    /// Anything else.
    Message(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Timeout(after) => write!(f, "timed out after {}ms", after.as_millis()),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

/// Why film details could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// No match for the title and year.
    NotFound,
    /// Transport failure.
    Network(String),
    /// Anything else.
    Message(String),
}

/// One entry of a fetched list, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFilm {
    /// Display title.
    pub title: String,
    /// Canonical film page.
    pub url: SourceRef,
    /// Release year, if the list shows it.
    #[serde(default)]
    pub year: Option<u16>,
    /// Member's rating on the list.
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Resolved film details; either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmDetails {
    /// Runtime in minutes.
    pub runtime_minutes: Option<Minutes>,
    /// Poster artwork reference.
    pub poster_url: Option<String>,
}

/// Reads a member's list. Pagination is the implementor's concern; the
/// returned entries are everything the list holds.
pub trait ListFetcher: Send + Sync + 'static {
    /// Fetches every entry of the list at `list_url`.
    fn fetch(&self, list_url: &str) -> impl Future<Output = Result<Vec<FetchedFilm>, FetchError>> + Send;
}

/// Optional runtime and poster lookup.
pub trait MetadataProvider: Send + Sync + 'static {
    /// Looks up runtime and poster for a film.
    fn resolve(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> impl Future<Output = Result<FilmDetails, MetadataError>> + Send;
}

/// Provider used when enrichment is not wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    async fn resolve(&self, _title: &str, _year: Option<u16>) -> Result<FilmDetails, MetadataError> {
        Err(MetadataError::NotFound)
    }
}

/// Receives progress events from an update cycle.
pub trait UpdateObserver: Send + Sync {
    /// Called synchronously from the cycle; keep it cheap.
    fn notify(&self, event: ContestEvent);
}

impl UpdateObserver for () {
    fn notify(&self, _event: ContestEvent) {}
}

impl UpdateObserver for broadcast::Sender<ContestEvent> {
    fn notify(&self, event: ContestEvent) {
        // No subscribers is fine.
        let _ = self.send(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl UpdateObserver for LogObserver {
    fn notify(&self, event: ContestEvent) {
        match event {
            ContestEvent::FetchStarted { member } => debug!("fetching list for {member}"),
            ContestEvent::FetchFailed { member, error } => warn!("skipping {member}: {error}"),
            ContestEvent::MemberReconciled {
                member,
                changed,
                new_films,
            } => debug!("{member}: changed={changed} new_films={new_films}"),
            ContestEvent::CycleComplete { changed, skipped } => {
                info!("update cycle complete: changed={changed} skipped={skipped}")
            }
            ContestEvent::Persisted => debug!("contest state saved"),
            ContestEvent::PersistFailed { error } => warn!("saving contest state failed: {error}"),
        }
    }
}
