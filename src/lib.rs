//! Film-watching contest tracking: snapshot reconciliation, ranking and
//! standings, with SQLite-backed state.
//!
//! # Examples
//!
//! Reconciling and ranking in memory:
//! ```
//! use filmbet::{
//!     core::contest::Contest,
//!     film::{Film, FilmSnapshot},
//!     member::Member,
//! };
//!
//! let mut ann = Member::new("ann", "/ann/", "/ann/list/");
//! let changed = ann.reconcile(FilmSnapshot::from_films(
//!     "/ann/list/",
//!     [Film::new("Dune", "/film/dune/").with_runtime(155)],
//! ));
//! assert!(changed);
//! assert_eq!(ann.films_since_last_update().len(), 1);
//!
//! let bo = Member::new("bo", "/bo/", "/bo/list/");
//! let mut contest = Contest::new("summer", vec![bo, ann]).expect("contest");
//! contest.rank();
//! assert_eq!(contest.members()[0].name, "ann");
//! assert_eq!(contest.members()[0].rank(), Some(1));
//! ```
//!
//! Runtime usage with a SQLite store:
//! ```no_run
//! use filmbet::{
//!     config::{load_contests, EngineConfig},
//!     core::contest::Contest,
//!     engine::{traits::{FetchError, FetchedFilm, ListFetcher}, updater::Updater},
//!     persist::sqlite::SqliteStore,
//!     runtime::handle::{spawn_contest, RuntimeConfig},
//! };
//!
//! struct Offline;
//!
//! impl ListFetcher for Offline {
//!     async fn fetch(&self, _list_url: &str) -> Result<Vec<FetchedFilm>, FetchError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = load_contests("contests.json").expect("config");
//! let store = SqliteStore::open("filmbet.db").expect("open sqlite");
//! let contest = Contest::restore(&config[0], &store).expect("contest");
//! let updater = Updater::new(Offline, EngineConfig::default());
//! let handle = spawn_contest(contest, updater, Some(Box::new(store)), RuntimeConfig::default());
//! let report = handle.update().await.expect("update");
//! println!("changed: {}", report.changed);
//! println!("{}", handle.standings_text().await.expect("standings"));
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Contest definitions and engine tunables.
pub mod config;
/// Contest aggregate and ranking.
pub mod core;
/// Collaborator traits and the update cycle driver.
pub mod engine;
/// Film identity and snapshots.
pub mod film;
/// Contest participants.
pub mod member;
/// Store abstraction with SQLite and in-memory implementations.
pub mod persist;
/// Standings text and renderer view.
pub mod render;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Serialized contest state.
pub mod state;
/// Shared primitive types.
pub mod types;
