use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::countdown::ControlSender;
use crate::domain::entity::{Phase, PhaseDuration};
use crate::utils::channel;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every phase finished by expiry or skip.
    Completed,
    Cancelled,
}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Idle,
    Running(Phase),
    Done(RunOutcome),
}

/// Snapshot of a run, kept up to date by the running task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub state: ScheduleState,
    pub remaining: PhaseDuration,
    pub paused: bool,
    /// 1-based position of the current phase, `0` before the first one.
    pub phase_number: u32,
}

impl RunStatus {
    pub(super) fn idle() -> Self {
        Self {
            state: ScheduleState::Idle,
            remaining: PhaseDuration::ZERO,
            paused: false,
            phase_number: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, ScheduleState::Done(_))
    }
}

/// Published after a phase ended by expiry or skip. Cancelled phases never
/// publish one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseFinished {
    pub phase: Phase,
    pub phase_number: u32,
    pub skipped: bool,
}

/// Control surface of a started run. Every operation returns immediately and
/// is a no-op once the run is over.
#[derive(Debug, Clone)]
pub struct ScheduleHandle {
    controls: ControlSender,
    time_remaining: Sender<PhaseDuration>,
    status: watch::Receiver<RunStatus>,
}

impl ScheduleHandle {
    pub(super) fn new(
        controls: ControlSender,
        time_remaining: Sender<PhaseDuration>,
        status: watch::Receiver<RunStatus>,
    ) -> Self {
        Self {
            controls,
            time_remaining,
            status,
        }
    }

    /// Pause the current phase. Ignored if already paused.
    pub fn pause(&self) {
        self.controls.pause();
    }

    /// Resume the current phase. Ignored if not paused.
    pub fn resume(&self) {
        self.controls.resume();
    }

    /// End the current phase early and continue with the next one.
    pub fn skip(&self) {
        self.controls.skip();
    }

    /// Start the current phase over from its full duration.
    pub fn restart(&self) {
        self.controls.restart();
    }

    /// Stop the run. A `00:00` time remaining value is published right away
    /// since an interrupted countdown publishes nothing itself.
    pub fn cancel(&self) {
        self.controls.cancel();
        channel::offer(&self.time_remaining, PhaseDuration::ZERO);
    }

    /// Returns the latest [`RunStatus`].
    pub fn status(&self) -> RunStatus {
        *self.status.borrow()
    }

    /// Wait until the [`RunStatus`] changes. Returns `false` once the running
    /// task is gone.
    pub async fn changed(&mut self) -> bool {
        self.status.changed().await.is_ok()
    }
}

/// Output surface of a started run. Time remaining and phase label updates
/// are lossy: when a buffer is full the newest value is dropped.
#[derive(Debug)]
pub struct ScheduleEvents {
    /// Stays open as long as a [`ScheduleHandle`] exists, use `completion`
    /// to learn when the run ended.
    pub time_remaining: Receiver<PhaseDuration>,
    pub phase_label: Receiver<String>,
    pub phase_finished: Receiver<PhaseFinished>,
    /// Resolves when the run completed or got cancelled.
    pub completion: JoinHandle<RunOutcome>,
}

/// A started run.
#[derive(Debug)]
pub struct ScheduleRun {
    pub handle: ScheduleHandle,
    pub events: ScheduleEvents,
}
