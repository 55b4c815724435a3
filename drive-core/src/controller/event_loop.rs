//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: one task, one owner of `DriveState`
//!
//! Actions from the presentation layer and upload ticks are selected in the
//! same loop, so each runs to completion before the next starts and catalog
//! writes are serialized without locks. The tick source is armed only while
//! an upload is in flight and is dropped together with the loop; cancelling
//! or dropping the [`DriveHandle`] therefore also stops the timer.

use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, warn};

use crate::controller::action_dispatcher::{Dispatched, dispatch};
use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::drive_state::DriveState;
use crate::upload::simulator::{CommittedIds, PROGRESS_COMPLETE, TickOutcome};
use crate::upload::ticker::TickSource;
use crate::view::snapshots::DriveSnapshot;

/// Outbound notifications for the renderer.
#[derive(Debug, Clone)]
pub enum DriveEvent {
    /// Fresh state after an action or a committed upload.
    Changed(Box<DriveSnapshot>),

    /// Progress indicator update, one per tick.
    UploadProgress { progress: u8 },

    /// The upload run committed; close any progress indicator.
    UploadCompleted { committed: CommittedIds },

    /// An action was refused and nothing changed.
    Rejected {
        action: &'static str,
        reason: String,
    },
}

pub struct EventLoop<T: TickSource> {
    state: DriveState,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_tx: mpsc::UnboundedSender<DriveEvent>,
    ticker: T,
    cancel: CancellationToken,
    actions_handled: u64,
    ticks_handled: u64,
}

impl<T: TickSource> EventLoop<T> {
    pub fn new(
        state: DriveState,
        action_rx: mpsc::UnboundedReceiver<Action>,
        event_tx: mpsc::UnboundedSender<DriveEvent>,
        ticker: T,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state,
            action_rx,
            event_tx,
            ticker,
            cancel,
            actions_handled: 0,
            ticks_handled: 0,
        }
    }

    /// Run until `Quit`, cancellation, or the action channel closing.
    /// Returns the final state.
    pub async fn run(mut self) -> DriveState {
        info!(
            marker = "EVENT_LOOP",
            operation_type = "loop_start",
            entries = self.state.catalog().len(),
            "Drive event loop started"
        );
        self.publish_snapshot();

        loop {
            let upload_pending = self.state.upload().is_pending();

            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!(marker = "EVENT_LOOP", "Cancellation requested");
                    break;
                }

                maybe_action = self.action_rx.recv() => {
                    let Some(action) = maybe_action else {
                        debug!(marker = "EVENT_LOOP", "Action channel closed");
                        break;
                    };
                    if self.handle_action(action).is_break() {
                        break;
                    }
                }

                () = self.ticker.next_tick(), if upload_pending => {
                    self.handle_tick();
                }
            }
        }

        if self.state.upload().is_pending() {
            warn!(
                marker = "EVENT_LOOP",
                operation_type = "upload_abandoned",
                progress = self.state.upload().progress(),
                "Event loop stopped with an upload in flight"
            );
        }
        self.ticker.disarm();

        info!(
            marker = "EVENT_LOOP",
            operation_type = "loop_stop",
            actions = self.actions_handled,
            ticks = self.ticks_handled,
            "Drive event loop stopped"
        );

        self.state
    }

    fn handle_action(&mut self, action: Action) -> ControlFlow<()> {
        self.actions_handled += 1;
        let name = action.name();

        match dispatch(&mut self.state, action) {
            Ok(Dispatched::Quit) => return ControlFlow::Break(()),
            Ok(Dispatched::UploadStarted { files }) => {
                debug!(marker = "EVENT_LOOP", files, "Arming upload ticks");
                self.ticker.arm();
                self.emit(DriveEvent::UploadProgress {
                    progress: self.state.upload().progress(),
                });
                self.publish_snapshot();
            }
            Ok(Dispatched::Changed) => self.publish_snapshot(),
            Err(e) if e.is_silent_rejection() => {
                debug!(marker = "EVENT_LOOP", action = name, reason = %e, "Action ignored");
            }
            Err(e) => {
                warn!(marker = "EVENT_LOOP", action = name, reason = %e, "Action rejected");
                self.emit(DriveEvent::Rejected {
                    action: name,
                    reason: e.to_string(),
                });
            }
        }

        ControlFlow::Continue(())
    }

    fn handle_tick(&mut self) {
        self.ticks_handled += 1;

        match self.state.tick_upload() {
            Ok(TickOutcome::Progress(progress)) => {
                self.emit(DriveEvent::UploadProgress { progress });
            }
            Ok(TickOutcome::Completed(committed)) => {
                self.ticker.disarm();
                self.emit(DriveEvent::UploadProgress {
                    progress: PROGRESS_COMPLETE,
                });
                self.emit(DriveEvent::UploadCompleted { committed });
                self.publish_snapshot();
            }
            Ok(TickOutcome::Idle) => self.ticker.disarm(),
            Err(e) => {
                error!(
                    marker = "EVENT_LOOP",
                    operation_type = "upload_commit_failed",
                    error = %e,
                    "Upload commit failed, retrying on next tick"
                );
                self.emit(DriveEvent::Rejected {
                    action: "upload_commit",
                    reason: e.to_string(),
                });
            }
        }
    }

    fn publish_snapshot(&self) {
        self.emit(DriveEvent::Changed(Box::new(self.state.snapshot())));
    }

    fn emit(&self, event: DriveEvent) {
        // A dropped receiver only means nobody is rendering any more.
        let _ = self.event_tx.send(event);
    }
}

/// Owning handle to a spawned [`EventLoop`]. Dropping it cancels the loop.
pub struct DriveHandle {
    pub actions: mpsc::UnboundedSender<Action>,
    pub events: mpsc::UnboundedReceiver<DriveEvent>,
    cancel: DropGuard,
    task: JoinHandle<DriveState>,
}

impl DriveHandle {
    /// Spawn the event loop on the current Tokio runtime.
    pub fn spawn<T>(state: DriveState, ticker: T) -> Self
    where
        T: TickSource + 'static,
    {
        let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<DriveEvent>();
        let cancel = CancellationToken::new();

        let event_loop = EventLoop::new(state, action_rx, event_tx, ticker, cancel.clone());
        let task = tokio::spawn(event_loop.run());

        Self {
            actions: action_tx,
            events: event_rx,
            cancel: cancel.drop_guard(),
            task,
        }
    }

    /// Queue an action. Fails only if the loop has already stopped.
    pub fn send(&self, action: Action) -> Result<(), AppError> {
        self.actions
            .send(action)
            .map_err(|e| AppError::Other(format!("event loop stopped, dropped {}", e.0.name())))
    }

    /// Stop the loop and hand back its final state.
    pub async fn shutdown(self) -> Result<DriveState, AppError> {
        let Self {
            actions,
            events: _events,
            cancel,
            task,
        } = self;
        drop(actions);
        cancel.disarm().cancel();

        task.await
            .map_err(|e| AppError::Other(format!("event loop task failed: {e}")))
    }

    /// Wait for the loop to stop on its own (e.g. after `Action::Quit`).
    pub async fn join(self) -> Result<DriveState, AppError> {
        let Self { task, cancel, .. } = self;
        let state = task
            .await
            .map_err(|e| AppError::Other(format!("event loop task failed: {e}")));
        drop(cancel);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::entry::EntryId;
    use crate::upload::descriptor::FileDescriptor;
    use crate::upload::ticker::{ImmediateTicker, IntervalTicker};
    use std::time::Duration;
    use tokio::time::timeout;

    fn empty_drive() -> DriveState {
        let config = Config {
            seed_sample_catalog: false,
            ..Config::default()
        };
        DriveState::new(&config).unwrap()
    }

    async fn next_event(handle: &mut DriveHandle) -> DriveEvent {
        timeout(Duration::from_secs(5), handle.events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_initial_snapshot_published() {
        let mut handle = DriveHandle::spawn(empty_drive(), ImmediateTicker::new());

        let event = next_event(&mut handle).await;

        assert!(matches!(event, DriveEvent::Changed(snap) if snap.entries.is_empty()));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_runs_to_completion() {
        let mut handle = DriveHandle::spawn(empty_drive(), ImmediateTicker::new());
        handle
            .send(Action::StartUpload(vec![
                FileDescriptor::new("d1.png", 100, Some("image/png")),
                FileDescriptor::new("d2.txt", 200, Some("text/plain")),
            ]))
            .unwrap();

        let mut progress = Vec::new();
        let committed = loop {
            match next_event(&mut handle).await {
                DriveEvent::UploadProgress { progress: p } => progress.push(p),
                DriveEvent::UploadCompleted { committed } => break committed,
                DriveEvent::Rejected { reason, .. } => panic!("unexpected rejection: {reason}"),
                DriveEvent::Changed(_) => {}
            }
        };

        assert_eq!(progress.first(), Some(&0));
        assert_eq!(progress.last(), Some(&100));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.iter().filter(|p| **p == 100).count(), 1);
        assert_eq!(committed.len(), 2);

        let DriveEvent::Changed(snap) = next_event(&mut handle).await else {
            panic!("expected snapshot after commit");
        };
        assert!(!snap.upload.pending);
        assert_eq!(snap.upload.progress, 100);
        assert_eq!(snap.entries[0].name, "d1.png");
        assert_eq!(snap.entries[1].name, "d2.txt");

        let state = handle.shutdown().await.unwrap();
        assert_eq!(state.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_rejections_reported_and_empty_batch_silent() {
        let mut handle = DriveHandle::spawn(empty_drive(), ImmediateTicker::new());
        let _initial = next_event(&mut handle).await;

        handle.send(Action::StartUpload(Vec::new())).unwrap();
        handle.send(Action::CreateFolder("   ".into())).unwrap();

        let event = next_event(&mut handle).await;
        assert!(matches!(
            event,
            DriveEvent::Rejected { action: "create_folder", .. }
        ));

        handle.send(Action::CreateFolder("Reports".into())).unwrap();
        let DriveEvent::Changed(snap) = next_event(&mut handle).await else {
            panic!("expected snapshot");
        };
        assert_eq!(snap.catalog_len, 1);
        assert!(snap.entries[0].is_folder());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let handle = DriveHandle::spawn(empty_drive(), ImmediateTicker::new());
        handle
            .send(Action::ToggleSelection(EntryId::from("ghost")))
            .unwrap();
        handle.send(Action::Quit).unwrap();

        let state = timeout(Duration::from_secs(5), handle.join())
            .await
            .unwrap()
            .unwrap();

        assert!(state.selection().is_selected(&EntryId::from("ghost")));
    }

    #[tokio::test]
    async fn test_cancel_mid_upload_leaves_run_uncommitted() {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        // Long enough that no tick can fire before cancellation.
        let ticker = IntervalTicker::new(Duration::from_secs(3600));
        let task = tokio::spawn(
            EventLoop::new(empty_drive(), action_rx, event_tx, ticker, cancel.clone()).run(),
        );

        action_tx
            .send(Action::StartUpload(vec![FileDescriptor::new("big.iso", 1, None)]))
            .unwrap();
        loop {
            let event = timeout(Duration::from_secs(5), event_rx.recv())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed");
            if matches!(&event, DriveEvent::Changed(snap) if snap.upload.pending) {
                break;
            }
        }

        cancel.cancel();
        let state = timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();

        assert!(state.upload().is_pending());
        assert!(state.upload().progress() < 100);
        assert_eq!(state.upload().incoming().len(), 1);
        assert!(state.catalog().is_empty());

        while let Some(event) = event_rx.recv().await {
            assert!(
                !matches!(event, DriveEvent::UploadCompleted { .. } | DriveEvent::UploadProgress { .. }),
                "tick delivered after cancellation: {event:?}"
            );
        }
        assert!(action_tx.send(Action::Refresh).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_mid_upload_returns_pending_state() {
        let mut handle =
            DriveHandle::spawn(empty_drive(), IntervalTicker::new(Duration::from_secs(3600)));
        let _initial = next_event(&mut handle).await;
        handle
            .send(Action::StartUpload(vec![FileDescriptor::new("big.iso", 1, None)]))
            .unwrap();
        assert!(matches!(
            next_event(&mut handle).await,
            DriveEvent::UploadProgress { progress: 0 }
        ));

        let state = handle.shutdown().await.unwrap();

        assert!(state.upload().is_pending());
        assert!(state.upload().progress() < 100);
        assert!(state.catalog().is_empty());
    }
}
