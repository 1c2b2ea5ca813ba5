use std::{future::Future, time::Duration};

use filmbet::{
    config::{ContestConfig, EngineConfig, MemberConfig},
    core::contest::Contest,
    engine::{
        traits::{FetchError, FetchedFilm, ListFetcher},
        updater::Updater,
    },
    persist::memory::MemoryStore,
    runtime::{
        events::ContestEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_contest},
    },
};

/// Every list holds one film named after the list.
struct EchoFetcher;

impl ListFetcher for EchoFetcher {
    fn fetch(&self, list_url: &str) -> impl Future<Output = Result<Vec<FetchedFilm>, FetchError>> + Send {
        let entries = vec![FetchedFilm {
            title: list_url.trim_matches('/').to_string(),
            url: format!("/film{list_url}"),
            year: None,
            rating: None,
        }];
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(entries)
        }
    }
}

fn config() -> ContestConfig {
    ContestConfig {
        name: "summer".to_string(),
        members: ["ann", "bo"]
            .iter()
            .map(|n| MemberConfig {
                name: n.to_string(),
                profile_url: format!("/{n}/"),
                contest_url: format!("/{n}/list/"),
                list: None,
            })
            .collect(),
    }
}

#[tokio::test]
async fn runtime_updates_saves_and_reports_events() {
    let store = MemoryStore::new();
    let contest = Contest::restore(&config(), &store).expect("contest");
    let updater = Updater::new(EchoFetcher, EngineConfig::default());
    let handle = spawn_contest(contest, updater, Some(Box::new(store.clone())), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let report = handle.update().await.expect("update");
    assert!(report.changed);
    assert!(report.skipped.is_empty());
    assert_eq!(store.save_count(), 1);

    let mut seen = Vec::new();
    while let Ok(evt) = sub.try_recv() {
        seen.push(evt);
    }
    let started = seen
        .iter()
        .filter(|e| matches!(e, ContestEvent::FetchStarted { .. }))
        .count();
    assert_eq!(started, 2);
    assert!(seen.contains(&ContestEvent::CycleComplete {
        changed: true,
        skipped: 0
    }));
    assert_eq!(seen.last(), Some(&ContestEvent::Persisted));

    let text = handle.standings_text().await.expect("text");
    assert!(text.starts_with("Standings as of "));
    assert!(text.contains("ann: 1 (+1)"));

    let rows = handle.standings().await.expect("rows");
    assert_eq!(rows.iter().map(|r| r.place).collect::<Vec<_>>(), vec![1, 1]);

    let report = handle.update().await.expect("second update");
    assert!(!report.changed);
    assert_eq!(store.save_count(), 1);

    let state = handle.export_state().await.expect("state");
    assert_eq!(Some(state), store.get("summer"));

    handle.shutdown().await.expect("shutdown");
    assert!(matches!(handle.update().await, Err(RuntimeError::ChannelClosed)));
}

#[tokio::test]
async fn clones_share_one_contest() {
    let contest = Contest::from_config(&config()).expect("contest");
    let handle = spawn_contest(
        contest,
        Updater::new(EchoFetcher, EngineConfig::default()),
        None,
        RuntimeConfig::default(),
    );
    let other = handle.clone();

    let (a, b) = tokio::join!(handle.update(), other.update());
    let changed = [a.expect("a").changed, b.expect("b").changed];
    assert_eq!(changed.iter().filter(|c| **c).count(), 1);

    handle.shutdown().await.expect("shutdown");
}
