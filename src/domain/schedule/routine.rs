use tokio::sync::mpsc::Sender;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::countdown::{
    ControlReceiver, CountdownExit, CountdownObserver, IntervalCountdown,
};
use crate::domain::entity::{Phase, PhaseDuration, ScheduleConfig};
use crate::domain::schedule::handle::{PhaseFinished, RunOutcome, RunStatus, ScheduleState};
use crate::utils::channel;

/// Sending halves of the three event streams.
#[derive(Debug)]
pub struct Outputs {
    pub time_remaining: Sender<PhaseDuration>,
    pub phase_label: Sender<String>,
    pub phase_finished: Sender<PhaseFinished>,
}

/// A [`ScheduleContext`] stores all objects relevant to the
/// [`ScheduleRoutine`] besides its run state.
pub struct ScheduleContext {
    pub config: ScheduleConfig,
    pub controls: ControlReceiver,
    pub outputs: Outputs,
    pub status: watch::Sender<RunStatus>,
}

/// Per-run state. Created fresh for every run and only touched by the
/// running task.
#[derive(Debug, Default)]
struct RunState {
    phase: Option<Phase>,
    remaining: PhaseDuration,
    phase_number: u32,
    paused: bool,
    /// Set once a cancel was observed, no phase starts after that.
    cancelled: bool,
}

impl RunState {
    fn snapshot(&self) -> RunStatus {
        RunStatus {
            state: match self.phase {
                Some(phase) => ScheduleState::Running(phase),
                None => ScheduleState::Idle,
            },
            remaining: self.remaining,
            paused: self.paused,
            phase_number: self.phase_number,
        }
    }
}

/// The task which walks through every phase of one run.
pub struct ScheduleRoutine {
    context: ScheduleContext,
    state: RunState,
}

impl ScheduleRoutine {
    /// Spawn a running [`ScheduleRoutine`] on background.
    pub fn spawn(context: ScheduleContext) -> JoinHandle<RunOutcome> {
        tokio::spawn(async move {
            let mut routine = Self {
                context,
                state: RunState::default(),
            };
            routine.run().await
        })
    }

    async fn run(&mut self) -> RunOutcome {
        let phases = self.context.config.phases();
        tracing::info!(phases = phases.len(), "Schedule started");

        for phase in phases {
            if self.context.controls.take_cancel() {
                tracing::debug!(%phase, "Cancelled before phase start");
                self.state.cancelled = true;
                break;
            }
            if self.run_phase(phase).await == CountdownExit::Cancelled {
                self.state.cancelled = true;
                break;
            }
        }

        let outcome = if self.state.cancelled {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        };
        if outcome == RunOutcome::Cancelled {
            // A tick may have slipped out after the cancel call published its
            // zero, so make sure the last value is zero.
            channel::offer(&self.context.outputs.time_remaining, PhaseDuration::ZERO);
            self.state.remaining = PhaseDuration::ZERO;
        }
        self.state.paused = false;
        let mut status = self.state.snapshot();
        status.state = ScheduleState::Done(outcome);
        self.context.status.send_replace(status);

        tracing::info!(?outcome, "Schedule finished");
        outcome
    }

    async fn run_phase(&mut self, phase: Phase) -> CountdownExit {
        let Self { context, state } = self;
        let duration = context.config.duration(phase);

        state.phase = Some(phase);
        state.phase_number += 1;
        state.remaining = duration;
        state.paused = false;
        let phase_number = state.phase_number;
        tracing::debug!(%phase, phase_number, %duration, "Phase started");

        context.status.send_replace(state.snapshot());
        channel::offer(&context.outputs.phase_label, phase.label());

        let mut observer = PhaseObserver {
            state,
            outputs: &context.outputs,
            status: &context.status,
        };
        let exit = IntervalCountdown::new(duration)
            .run(&mut context.controls, &mut observer)
            .await;
        tracing::debug!(%phase, phase_number, ?exit, "Phase ended");

        match exit {
            CountdownExit::Expired | CountdownExit::Skipped => {
                channel::offer(
                    &context.outputs.phase_finished,
                    PhaseFinished {
                        phase,
                        phase_number,
                        skipped: exit == CountdownExit::Skipped,
                    },
                );
            }
            CountdownExit::Cancelled => {}
        }
        exit
    }
}

/// Forwards countdown progress into the run state and the event streams.
struct PhaseObserver<'a> {
    state: &'a mut RunState,
    outputs: &'a Outputs,
    status: &'a watch::Sender<RunStatus>,
}

impl CountdownObserver for PhaseObserver<'_> {
    fn tick(&mut self, remaining: PhaseDuration) {
        self.state.remaining = remaining;
        self.status.send_replace(self.state.snapshot());
        channel::offer(&self.outputs.time_remaining, remaining);
    }

    fn paused(&mut self, paused: bool) {
        self.state.paused = paused;
        self.status.send_replace(self.state.snapshot());
    }
}
