use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    chart::{self, MomentumChart},
    core::state::{MatchOutcome, MatchState, MatchTracker},
    export::{ExportTarget, Exporter, ReportOutcome},
    op::{MatchAction, StoredOp},
    types::{GameTally, Side},
};

use super::events::TrackerEvent;

/// Message returned when only the seed point exists.
pub const NO_POINTS_MESSAGE: &str = "No actual match points recorded to export.";

/// Errors returned by [`TrackerHandle`].
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Another export has not completed yet.
    #[error("an export is already in progress")]
    ExportInFlight,
    /// The tracker task has stopped.
    #[error("tracker runtime is no longer running")]
    ChannelClosed,
}

/// Channel sizing for the tracker task.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command queue.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable front end of the tracker task.
#[derive(Clone)]
pub struct TrackerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<TrackerEvent>,
}

enum Command {
    Apply {
        action: MatchAction,
        resp: oneshot::Sender<Option<StoredOp>>,
    },
    Snapshot {
        resp: oneshot::Sender<MatchState>,
    },
    Chart {
        resp: oneshot::Sender<MomentumChart>,
    },
    Outcome {
        resp: oneshot::Sender<MatchOutcome>,
    },
    DrainOps {
        resp: oneshot::Sender<Vec<StoredOp>>,
    },
    Export {
        target: ExportTarget,
        resp: oneshot::Sender<Result<ReportOutcome, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `tracker` into a task that owns it and serves commands one at a time.
pub fn spawn_tracker(
    tracker: MatchTracker,
    exporter: Exporter,
    config: RuntimeConfig,
) -> TrackerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<TrackerEvent>(config.event_capacity);
    let (export_done_tx, mut export_done_rx) = mpsc::unbounded_channel::<bool>();

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut tracker = tracker;
        let mut export_in_flight = false;

        loop {
            tokio::select! {
                biased;

                done = export_done_rx.recv() => {
                    if let Some(success) = done {
                        export_in_flight = false;
                        let _ = events_tx_loop.send(TrackerEvent::ExportFinished { success });
                    }
                }
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    let done = handle_command(
                        cmd,
                        &mut tracker,
                        &exporter,
                        &events_tx_loop,
                        &export_done_tx,
                        &mut export_in_flight,
                    );
                    if done {
                        break;
                    }
                }
            }
        }
        debug!("tracker runtime stopped");
    });

    TrackerHandle { cmd_tx, events_tx }
}

impl TrackerHandle {
    /// Subscribes to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events_tx.subscribe()
    }

    /// Returns `None` when the action was ignored.
    pub async fn apply(&self, action: MatchAction) -> Result<Option<StoredOp>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Apply { action, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Records a rally won by `winner`.
    pub async fn record_point(&self, winner: Side) -> Result<Option<StoredOp>, RuntimeError> {
        self.apply(MatchAction::PointWon { side: winner }).await
    }

    /// Records a game won by `winner`, promoting it to a set when it closes one.
    pub async fn record_game_win(&self, winner: Side) -> Result<Option<StoredOp>, RuntimeError> {
        self.apply(MatchAction::GameWon { side: winner }).await
    }

    /// Awards the current set directly.
    pub async fn record_set_win(
        &self,
        winner: Side,
        final_games: GameTally,
    ) -> Result<Option<StoredOp>, RuntimeError> {
        self.apply(MatchAction::SetWon {
            side: winner,
            final_games,
        })
        .await
    }

    /// Retires `party` from the match.
    pub async fn withdraw(&self, party: Side) -> Result<Option<StoredOp>, RuntimeError> {
        self.apply(MatchAction::Withdrew { party }).await
    }

    /// Owned copy of the current match state.
    pub async fn snapshot(&self) -> Result<MatchState, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Momentum chart derived from the current history and markers.
    pub async fn chart(&self) -> Result<MomentumChart, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Chart { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current match outcome; pending while play continues.
    pub async fn outcome(&self) -> Result<MatchOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Outcome { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Takes the journal entries applied since the last drain.
    pub async fn drain_ops(&self) -> Result<Vec<StoredOp>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::DrainOps { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Exports the recorded points (seed excluded). Resolves after the
    /// exporter's latency; fails fast while another export is outstanding.
    pub async fn export(&self, target: ExportTarget) -> Result<ReportOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Export { target, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the tracker task after commands already queued.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    tracker: &mut MatchTracker,
    exporter: &Exporter,
    events_tx: &broadcast::Sender<TrackerEvent>,
    export_done_tx: &mpsc::UnboundedSender<bool>,
    export_in_flight: &mut bool,
) -> bool {
    match cmd {
        Command::Apply { action, resp } => {
            let res = apply_and_publish(tracker, action, events_tx);
            let _ = resp.send(res);
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(tracker.export_snapshot());
        }
        Command::Chart { resp } => {
            let _ = resp.send(chart::from_state(tracker.state()));
        }
        Command::Outcome { resp } => {
            let _ = resp.send(tracker.compute_match_outcome());
        }
        Command::DrainOps { resp } => {
            let _ = resp.send(tracker.drain_pending_ops());
        }
        Command::Export { target, resp } => {
            if *export_in_flight {
                warn!("export requested while another is in flight");
                let _ = resp.send(Err(RuntimeError::ExportInFlight));
                return false;
            }

            let points = tracker.exportable_points();
            if points.is_empty() {
                let _ = events_tx.send(TrackerEvent::ExportFinished { success: false });
                let _ = resp.send(Ok(ReportOutcome::failure(NO_POINTS_MESSAGE)));
                return false;
            }

            *export_in_flight = true;
            let exporter = exporter.clone();
            let done_tx = export_done_tx.clone();
            tokio::spawn(async move {
                let outcome = exporter.submit_report(&points, &target).await;
                let _ = done_tx.send(outcome.success);
                let _ = resp.send(Ok(outcome));
            });
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn apply_and_publish(
    tracker: &mut MatchTracker,
    action: MatchAction,
    events_tx: &broadcast::Sender<TrackerEvent>,
) -> Option<StoredOp> {
    let sets_before = tracker.set_markers().len();
    let was_over = tracker.is_over();

    let stored = tracker.apply(action)?;
    let state = tracker.state();

    match action {
        MatchAction::PointWon { .. } => {
            let _ = events_tx.send(TrackerEvent::PointRecorded {
                sequence: state.point_sequence,
                score_difference: state.score_difference,
            });
        }
        MatchAction::GameWon { side } => {
            if let Some(marker) = state.game_markers.last() {
                let _ = events_tx.send(TrackerEvent::GameWon {
                    side,
                    game_score: marker.game_score.clone(),
                });
            }
        }
        MatchAction::SetWon { .. } => {}
        MatchAction::Withdrew { party } => {
            let _ = events_tx.send(TrackerEvent::Withdrawn { party });
        }
    }

    if state.set_markers.len() > sets_before {
        if let Some(marker) = state.set_markers.last() {
            let _ = events_tx.send(TrackerEvent::SetWon {
                set_number: marker.set_number,
                side: marker.winner,
                set_score: marker.set_score.clone(),
                sets: state.sets,
            });
        }
    }

    if !was_over && tracker.is_over() {
        let outcome = tracker.compute_match_outcome();
        info!(?outcome, "match concluded");
        let _ = events_tx.send(TrackerEvent::MatchOver { outcome });
    }

    Some(stored)
}
