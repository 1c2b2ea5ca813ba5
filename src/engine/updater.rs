//! Drives update cycles: concurrent list fetches, detail enrichment and
//! saving.

use std::sync::Arc;

use chrono::Local;
use log::{debug, info, warn};
use tokio::{
    sync::Semaphore,
    time::{Instant, timeout, timeout_at},
};

use crate::{
    config::EngineConfig,
    core::contest::{Contest, SkippedMember},
    film::{Film, FilmSnapshot},
    member::Member,
    persist::{PersistError, SharedStore, save_state},
    runtime::events::ContestEvent,
};

use super::traits::{FetchError, ListFetcher, MetadataProvider, NoMetadata, UpdateObserver};

/// Result of [`Updater::update`].
#[derive(Debug)]
pub struct UpdateReport {
    /// True when at least one member's snapshot changed.
    pub changed: bool,
    /// Members whose fetch failed; their state is unchanged.
    pub skipped: Vec<SkippedMember>,
    /// Set when state changed but could not be saved.
    pub persist_error: Option<PersistError>,
}

/// Refreshes contests through a [`ListFetcher`] and optional metadata lookup.
pub struct Updater<F, M = NoMetadata> {
    fetcher: Arc<F>,
    metadata: Option<Arc<M>>,
    config: EngineConfig,
}

impl<F: ListFetcher> Updater<F, NoMetadata> {
    /// Updater without metadata enrichment.
    pub fn new(fetcher: F, config: EngineConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            metadata: None,
            config,
        }
    }
}

impl<F: ListFetcher, M: MetadataProvider> Updater<F, M> {
    /// Attaches a metadata provider, used when `get_film_details` is set.
    pub fn with_metadata<M2: MetadataProvider>(self, provider: M2) -> Updater<F, M2> {
        Updater {
            fetcher: self.fetcher,
            metadata: Some(Arc::new(provider)),
            config: self.config,
        }
    }

    /// Settings this updater runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one full cycle: fetch, reconcile, rank, render, and save if changed.
    pub async fn update(
        &self,
        contest: &mut Contest,
        store: Option<&SharedStore>,
        observer: &dyn UpdateObserver,
    ) -> UpdateReport {
        let fetched = self.fetch_all(contest.members(), observer).await;
        let outcome = contest.apply_cycle(fetched, Local::now().naive_local(), observer);

        let mut report = UpdateReport {
            changed: outcome.changed,
            skipped: outcome.skipped,
            persist_error: None,
        };

        if report.changed {
            if let Some(store) = store {
                match save_state(store, contest.export_state(), self.config.keep_history).await {
                    Ok(()) => observer.notify(ContestEvent::Persisted),
                    Err(err) => {
                        warn!("could not save {}: {err}", contest.name());
                        observer.notify(ContestEvent::PersistFailed {
                            error: err.to_string(),
                        });
                        report.persist_error = Some(err);
                    }
                }
            }
        }

        info!(
            "{}: cycle done, changed={} skipped={}",
            contest.name(),
            report.changed,
            report.skipped.len()
        );
        report
    }

    /// Fetches a fresh snapshot for every member.
    ///
    /// Fetches run concurrently up to the configured limit. Results come back
    /// in member order regardless of completion order.
    pub async fn fetch_all(
        &self,
        members: &[Member],
        observer: &dyn UpdateObserver,
    ) -> Vec<(String, Result<FilmSnapshot, FetchError>)> {
        let permits = Arc::new(Semaphore::new(self.config.concurrency()));
        let enrich = if self.config.get_film_details {
            self.metadata.clone()
        } else {
            None
        };
        let fetch_timeout = self.config.fetch_timeout();
        let metadata_timeout = self.config.metadata_timeout();

        let mut handles = Vec::with_capacity(members.len());
        for member in members {
            observer.notify(ContestEvent::FetchStarted {
                member: member.name.clone(),
            });

            let fetcher = Arc::clone(&self.fetcher);
            let enrich = enrich.clone();
            let permits = Arc::clone(&permits);
            let list_url = member.contest_url.clone();
            let previous = member.snapshot().clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return Err(FetchError::Message("fetch pool closed".to_string()));
                };
                let entries = match timeout(fetch_timeout, fetcher.fetch(&list_url)).await {
                    Ok(result) => result?,
                    Err(_) => return Err(FetchError::Timeout(fetch_timeout)),
                };
                debug!("{list_url}: {} entries", entries.len());

                // One lookup budget per member, shared by all of its films.
                let details_deadline = Instant::now() + metadata_timeout;
                let mut films = Vec::with_capacity(entries.len());
                for entry in entries {
                    let mut film = Film {
                        title: entry.title,
                        url: entry.url,
                        year: entry.year,
                        rating: entry.rating,
                        ..Film::default()
                    };
                    carry_details(&mut film, &previous);
                    if let Some(provider) = enrich.as_deref() {
                        if film.runtime_minutes.is_none() && Instant::now() < details_deadline {
                            resolve_details(provider, &mut film, details_deadline).await;
                        }
                    }
                    films.push(film);
                }

                Ok(FilmSnapshot::from_films(list_url, films))
            });
            handles.push((member.name.clone(), handle));
        }

        let mut out = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(FetchError::Message(format!("fetch task failed: {e}"))));
            out.push((name, result));
        }
        out
    }
}

/// Keeps runtime and poster already known from the previous snapshot.
fn carry_details(film: &mut Film, previous: &FilmSnapshot) {
    if let Some(known) = previous.get(film) {
        film.runtime_minutes = film.runtime_minutes.or(known.runtime_minutes);
        if film.poster_url.is_none() {
            film.poster_url = known.poster_url.clone();
        }
    }
}

async fn resolve_details<M: MetadataProvider>(provider: &M, film: &mut Film, deadline: Instant) {
    match timeout_at(deadline, provider.resolve(&film.title, film.year)).await {
        Ok(Ok(details)) => {
            film.runtime_minutes = details.runtime_minutes.or(film.runtime_minutes);
            film.poster_url = details.poster_url.or(film.poster_url.take());
        }
        Ok(Err(err)) => warn!("no details for {}: {err:?}", film.title),
        Err(_) => warn!("details for {} ran out of time", film.title),
    }
}
