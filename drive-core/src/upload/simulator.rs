//! ``src/upload/simulator.rs``
//! ============================================================================
//! # Upload Simulator: tick-driven progress ramp with a single commit
//!
//! `Idle → Running → Idle`. A run starts with a non-empty batch of
//! descriptors, advances by a fixed step on every tick and, on the tick that
//! reaches 100, turns the descriptors into file entries and prepends them to
//! the catalog as one batch. No I/O happens anywhere.
//!
//! Ticks are supplied from outside (see `upload::ticker`), so the machine can
//! be driven to completion deterministically.

use chrono::{DateTime, Local};
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::entry::{Entry, EntryId};
use crate::upload::descriptor::FileDescriptor;
use crate::util::clock::Clock;
use crate::util::id_gen::{IdGenerator, UPLOAD_PREFIX};

pub const DEFAULT_PROGRESS_STEP: u8 = 10;
pub const PROGRESS_COMPLETE: u8 = 100;

/// Ids committed by one run, in descriptor order.
pub type CommittedIds = SmallVec<[EntryId; 4]>;

/// Transient state of one run, from `start` to commit.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub progress: u8,
    pub incoming: Vec<FileDescriptor>,
    pub started_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Running(UploadSession),
}

/// Result of feeding one tick to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No run in flight; the tick was ignored.
    Idle,

    /// Progress advanced but the run is not finished.
    Progress(u8),

    /// Progress hit 100 and the batch was committed.
    Completed(CommittedIds),
}

#[derive(Debug, Clone)]
pub struct UploadSimulator {
    phase: Phase,
    step: u8,
    last_progress: u8,
    completed_runs: u64,
}

impl Default for UploadSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_STEP)
    }
}

impl UploadSimulator {
    /// `step` is clamped to `1..=100` so every run terminates.
    #[must_use]
    pub fn new(step: u8) -> Self {
        Self {
            phase: Phase::Idle,
            step: step.clamp(1, PROGRESS_COMPLETE),
            last_progress: 0,
            completed_runs: 0,
        }
    }

    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    /// True while a run is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Current progress while running; otherwise the last value observed
    /// (100 after a completed run, 0 before the first one).
    #[must_use]
    pub const fn progress(&self) -> u8 {
        match &self.phase {
            Phase::Running(session) => session.progress,
            Phase::Idle => self.last_progress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&UploadSession> {
        match &self.phase {
            Phase::Running(session) => Some(session),
            Phase::Idle => None,
        }
    }

    /// Descriptors waiting for commit; empty when idle.
    #[must_use]
    pub fn incoming(&self) -> &[FileDescriptor] {
        match &self.phase {
            Phase::Running(session) => &session.incoming,
            Phase::Idle => &[],
        }
    }

    #[must_use]
    pub const fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    /// Begin a run. Returns the batch size.
    ///
    /// An empty batch is [`AppError::EmptyUploadBatch`] and a call while a
    /// run is in flight is [`AppError::UploadInProgress`]; neither changes
    /// any state.
    pub fn start(
        &mut self,
        descriptors: Vec<FileDescriptor>,
        started_at: DateTime<Local>,
    ) -> Result<usize, AppError> {
        if descriptors.is_empty() {
            debug!(
                marker = "UPLOAD_SIM",
                operation_type = "upload_start_empty",
                "Ignoring upload with no files"
            );
            return Err(AppError::EmptyUploadBatch);
        }

        if let Phase::Running(session) = &self.phase {
            warn!(
                marker = "UPLOAD_SIM",
                operation_type = "upload_start_rejected",
                progress = session.progress,
                pending_files = session.incoming.len(),
                "Upload already running, rejecting new batch"
            );
            return Err(AppError::UploadInProgress {
                progress: session.progress,
            });
        }

        let files = descriptors.len();
        let total_bytes: u64 = descriptors.iter().map(|d| d.byte_length).sum();

        self.last_progress = 0;
        self.phase = Phase::Running(UploadSession {
            progress: 0,
            incoming: descriptors,
            started_at,
        });

        info!(
            marker = "UPLOAD_SIM",
            operation_type = "upload_start",
            files,
            total_bytes,
            step = self.step,
            "Upload started"
        );

        Ok(files)
    }

    /// Advance the run by one step, committing on the tick that reaches 100.
    /// Completion happens at most once per `start`.
    ///
    /// If the commit is refused the run stays in flight with its descriptors
    /// and its last reported progress, and the next tick retries it.
    pub fn tick(
        &mut self,
        catalog: &mut Catalog,
        ids: &mut IdGenerator,
        clock: &dyn Clock,
    ) -> Result<TickOutcome, AppError> {
        let Phase::Running(session) = &mut self.phase else {
            return Ok(TickOutcome::Idle);
        };
        let progress = session
            .progress
            .saturating_add(self.step)
            .min(PROGRESS_COMPLETE);

        if progress < PROGRESS_COMPLETE {
            session.progress = progress;
            self.last_progress = progress;
            trace!(
                marker = "UPLOAD_SIM",
                operation_type = "upload_tick",
                progress,
                "Upload progress"
            );
            return Ok(TickOutcome::Progress(progress));
        }

        let committed_at = clock.now();
        let entries: Vec<Entry> = session
            .incoming
            .iter()
            .map(|descriptor| {
                let id = ids.next_id(UPLOAD_PREFIX, committed_at);
                debug_assert!(!catalog.contains(&id), "minted upload id {id} already in catalog");
                descriptor.clone().into_entry(id, committed_at)
            })
            .collect();
        let committed: CommittedIds = entries.iter().map(|entry| entry.id.clone()).collect();

        if let Err(e) = catalog.prepend(entries) {
            warn!(
                marker = "UPLOAD_SIM",
                operation_type = "upload_commit_failed",
                progress = session.progress,
                pending_files = session.incoming.len(),
                error = %e,
                "Upload commit refused, run kept in flight"
            );
            return Err(e);
        }

        let started_at = session.started_at;
        self.phase = Phase::Idle;
        self.last_progress = PROGRESS_COMPLETE;
        self.completed_runs += 1;

        info!(
            marker = "UPLOAD_SIM",
            operation_type = "upload_complete",
            files = committed.len(),
            elapsed_ms = (committed_at - started_at).num_milliseconds(),
            catalog_len = catalog.len(),
            "Upload committed"
        );

        Ok(TickOutcome::Completed(committed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::MediaKind;
    use crate::util::clock::FixedClock;
    use chrono::TimeZone;

    struct Rig {
        sim: UploadSimulator,
        catalog: Catalog,
        ids: IdGenerator,
        clock: FixedClock,
    }

    impl Rig {
        fn new(step: u8) -> Self {
            let clock = FixedClock(Local.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap());
            let catalog = Catalog::with_entries(vec![Entry::folder(
                EntryId::from("1"),
                "Documentos",
                clock.0,
            )])
            .unwrap();
            Self {
                sim: UploadSimulator::new(step),
                catalog,
                ids: IdGenerator::new(),
                clock,
            }
        }

        fn tick(&mut self) -> TickOutcome {
            self.sim
                .tick(&mut self.catalog, &mut self.ids, &self.clock)
                .unwrap()
        }

        fn run_to_completion(&mut self) -> Vec<TickOutcome> {
            let mut outcomes = Vec::new();
            while self.sim.is_pending() {
                outcomes.push(self.tick());
                assert!(outcomes.len() <= 100, "run did not terminate");
            }
            outcomes
        }
    }

    fn two_files() -> Vec<FileDescriptor> {
        vec![
            FileDescriptor::new("d1.png", 3_984_588, Some("image/png")),
            FileDescriptor::new("d2.bin", 1024, None),
        ]
    }

    #[test]
    fn test_completion_commits_batch_in_order() {
        let mut rig = Rig::new(DEFAULT_PROGRESS_STEP);
        let before = rig.catalog.len();
        rig.sim.start(two_files(), rig.clock.0).unwrap();
        assert!(rig.sim.is_pending());
        assert_eq!(rig.sim.incoming().len(), 2);

        let outcomes = rig.run_to_completion();

        assert_eq!(outcomes.len(), 10);
        assert!(!rig.sim.is_pending());
        assert_eq!(rig.sim.progress(), 100);
        assert!(rig.sim.incoming().is_empty());
        assert_eq!(rig.catalog.len(), before + 2);

        let list = rig.catalog.list();
        assert_eq!(list[0].name, "d1.png");
        assert_eq!(list[1].name, "d2.bin");
        assert_eq!(list[2].id.as_str(), "1");
        assert_eq!(list[0].media_kind(), Some(MediaKind::Image));
        assert_eq!(list[1].media_kind(), Some(MediaKind::Other));
        assert_eq!(list[0].modified_at, rig.clock.0);

        let Some(TickOutcome::Completed(committed)) = outcomes.last() else {
            panic!("last tick should complete the run");
        };
        assert_eq!(committed.as_slice(), [list[0].id.clone(), list[1].id.clone()]);
    }

    #[test]
    fn test_progress_monotonic_and_single_completion() {
        let mut rig = Rig::new(DEFAULT_PROGRESS_STEP);
        rig.sim.start(two_files(), rig.clock.0).unwrap();

        let outcomes = rig.run_to_completion();
        let observed: Vec<u8> = outcomes
            .iter()
            .map(|outcome| match outcome {
                TickOutcome::Progress(p) => *p,
                TickOutcome::Completed(_) => PROGRESS_COMPLETE,
                TickOutcome::Idle => panic!("idle tick during run"),
            })
            .collect();

        assert!(observed.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(observed.iter().filter(|p| **p == 100).count(), 1);
        assert_eq!(observed.last(), Some(&100));
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, TickOutcome::Completed(_)))
                .count(),
            1
        );

        let len = rig.catalog.len();
        assert_eq!(rig.tick(), TickOutcome::Idle);
        assert_eq!(rig.catalog.len(), len);
        assert_eq!(rig.sim.completed_runs(), 1);
    }

    #[test]
    fn test_uneven_step_clamps_to_exactly_100() {
        let mut rig = Rig::new(30);
        rig.sim.start(two_files(), rig.clock.0).unwrap();

        let outcomes = rig.run_to_completion();

        assert_eq!(
            outcomes[..3],
            [
                TickOutcome::Progress(30),
                TickOutcome::Progress(60),
                TickOutcome::Progress(90)
            ]
        );
        assert!(matches!(outcomes[3], TickOutcome::Completed(_)));
        assert_eq!(rig.sim.progress(), 100);
    }

    #[test]
    fn test_zero_step_is_clamped() {
        assert_eq!(UploadSimulator::new(0).step(), 1);
        assert_eq!(UploadSimulator::new(250).step(), 100);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut rig = Rig::new(DEFAULT_PROGRESS_STEP);

        let result = rig.sim.start(Vec::new(), rig.clock.0);

        assert!(matches!(result, Err(AppError::EmptyUploadBatch)));
        assert!(!rig.sim.is_pending());
        assert_eq!(rig.sim.progress(), 0);
    }

    #[test]
    fn test_restart_while_running_rejected() {
        let mut rig = Rig::new(DEFAULT_PROGRESS_STEP);
        rig.sim.start(two_files(), rig.clock.0).unwrap();
        rig.tick();
        rig.tick();

        let result = rig.sim.start(vec![FileDescriptor::new("late.txt", 1, None)], rig.clock.0);

        assert!(matches!(result, Err(AppError::UploadInProgress { progress: 20 })));
        assert_eq!(rig.sim.incoming().len(), 2);
        rig.run_to_completion();
        assert_eq!(rig.catalog.len(), 3);
    }

    #[test]
    fn test_second_run_resets_progress() {
        let mut rig = Rig::new(50);
        rig.sim.start(two_files(), rig.clock.0).unwrap();
        rig.run_to_completion();
        assert_eq!(rig.sim.progress(), 100);

        rig.sim
            .start(vec![FileDescriptor::new("again.mp3", 10, Some("audio/mpeg"))], rig.clock.0)
            .unwrap();

        assert_eq!(rig.sim.progress(), 0);
        rig.run_to_completion();
        assert_eq!(rig.catalog.list()[0].name, "again.mp3");
        assert_eq!(rig.catalog.len(), 4);
        assert_eq!(rig.sim.completed_runs(), 2);
    }

    #[test]
    fn test_refused_commit_keeps_run_in_flight() {
        let mut rig = Rig::new(50);
        rig.sim.start(two_files(), rig.clock.0).unwrap();
        assert_eq!(rig.tick(), TickOutcome::Progress(50));

        // Occupy the id the commit is about to mint.
        let taken = IdGenerator::new().next_id(UPLOAD_PREFIX, rig.clock.0);
        rig.catalog
            .prepend(vec![Entry::folder(taken, "squatter", rig.clock.0)])
            .unwrap();

        // Release builds return the error; debug builds trip the freshness assertion.
        let refused = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            rig.sim.tick(&mut rig.catalog, &mut rig.ids, &rig.clock)
        }));
        assert!(!matches!(refused, Ok(Ok(_))));

        assert!(rig.sim.is_pending());
        assert_eq!(rig.sim.progress(), 50);
        assert_eq!(rig.sim.incoming().len(), 2);
        assert_eq!(rig.sim.completed_runs(), 0);
        assert_eq!(rig.catalog.len(), 2);

        let TickOutcome::Completed(committed) = rig.tick() else {
            panic!("retry should commit with fresh ids");
        };
        assert_eq!(committed.len(), 2);
        assert_eq!(rig.catalog.list()[0].name, "d1.png");
        assert_eq!(rig.catalog.len(), 4);
        assert!(!rig.sim.is_pending());
    }
}
