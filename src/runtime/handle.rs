//! Single-writer contest task and its handle.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    core::contest::Contest,
    engine::{
        traits::{ListFetcher, MetadataProvider},
        updater::{UpdateReport, Updater},
    },
    persist::{self, ContestStore},
    render::StandingEntry,
    state::ContestState,
};

use super::events::ContestEvent;

/// Failure to reach the contest task.
#[derive(Debug)]
pub enum RuntimeError {
    /// The task has shut down.
    ChannelClosed,
}

/// Channel sizes for [`spawn_contest`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 16,
            event_capacity: 256,
        }
    }
}

/// Cloneable front end to a contest owned by a single task.
///
/// Commands are handled one at a time, so update cycles for the contest
/// never overlap and saves never interleave.
pub struct ContestHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ContestEvent>,
}

impl Clone for ContestHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Update {
        resp: oneshot::Sender<UpdateReport>,
    },
    StandingsText {
        resp: oneshot::Sender<String>,
    },
    Standings {
        resp: oneshot::Sender<Vec<StandingEntry>>,
    },
    ExportState {
        resp: oneshot::Sender<ContestState>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `contest` into its own task and returns a handle to it.
///
/// Saves go to `store` when one is given.
pub fn spawn_contest<F, M>(
    contest: Contest,
    updater: Updater<F, M>,
    store: Option<Box<dyn ContestStore>>,
    config: RuntimeConfig,
) -> ContestHandle
where
    F: ListFetcher,
    M: MetadataProvider,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ContestEvent>(config.event_capacity.max(1));
    let store = store.map(persist::shared);
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut contest = contest;

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Update { resp } => {
                    let report = updater
                        .update(&mut contest, store.as_ref(), &events_tx_loop)
                        .await;
                    let _ = resp.send(report);
                }
                Command::StandingsText { resp } => {
                    let _ = resp.send(contest.standings_text().to_string());
                }
                Command::Standings { resp } => {
                    let _ = resp.send(contest.standings());
                }
                Command::ExportState { resp } => {
                    let _ = resp.send(contest.export_state());
                }
                Command::Shutdown { resp } => {
                    let _ = resp.send(());
                    break;
                }
            }
        }
    });

    ContestHandle { cmd_tx, events_tx }
}

impl ContestHandle {
    /// Receiver for events of cycles started after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ContestEvent> {
        self.events_tx.subscribe()
    }

    /// Runs one update cycle and waits for its report.
    pub async fn update(&self) -> Result<UpdateReport, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Update { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current standings text.
    pub async fn standings_text(&self) -> Result<String, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::StandingsText { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current ranked rows.
    pub async fn standings(&self) -> Result<Vec<StandingEntry>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Standings { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Snapshot of the contest state.
    pub async fn export_state(&self) -> Result<ContestState, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ExportState { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the task after commands already queued.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}
