use tokio::time::{Duration, Interval, MissedTickBehavior};

use crate::domain::countdown::control::ControlReceiver;
use crate::domain::countdown::{CountdownExit, CountdownObserver};
use crate::domain::entity::PhaseDuration;

const TICK: Duration = Duration::from_secs(1);

/// Objects a [`CountdownState`] needs besides its own data.
pub struct CountdownContext<'a> {
    pub target: PhaseDuration,
    pub controls: &'a mut ControlReceiver,
    pub observer: &'a mut dyn CountdownObserver,
}

#[enum_dispatch::enum_dispatch]
pub trait StateRun {
    async fn run(self, context: &mut CountdownContext<'_>) -> CountdownState;
}

/// Running state of one countdown.
#[derive(Debug)]
#[enum_dispatch::enum_dispatch(StateRun)]
pub enum CountdownState {
    Running(RunningState),
    Paused(PausedState),
    Finished(FinishedState),
}

impl CountdownState {
    /// Start ticking from `remaining`.
    pub async fn start(remaining: PhaseDuration) -> Self {
        RunningState {
            remaining,
            timer: spawn_timer().await,
        }
        .into()
    }

    /// Returns the exit if the countdown is over.
    pub fn exit(&self) -> Option<CountdownExit> {
        match self {
            Self::Finished(state) => Some(state.exit),
            _ => None,
        }
    }
}

/// A state which indicates that the countdown is ticking.
#[derive(Debug)]
pub struct RunningState {
    remaining: PhaseDuration,
    timer: Interval,
}

impl StateRun for RunningState {
    async fn run(mut self, context: &mut CountdownContext<'_>) -> CountdownState {
        let controls = &mut *context.controls;
        tokio::select! {
            biased;
            Some(()) = controls.cancel.recv() => self.finish(CountdownExit::Cancelled),
            Some(()) = controls.pause.recv() => self.handle_pause(context),
            Some(()) = controls.resume.recv() => self.into(),
            Some(()) = controls.skip.recv() => self.finish(CountdownExit::Skipped),
            Some(()) = controls.restart.recv() => self.handle_restart(context),
            _ = self.timer.tick() => self.handle_tick(context),
        }
    }
}

impl RunningState {
    fn handle_tick(mut self, context: &mut CountdownContext<'_>) -> CountdownState {
        self.remaining.decrement();
        tracing::trace!(remaining = %self.remaining, "Tick");
        context.observer.tick(self.remaining);

        if self.remaining.is_zero() {
            self.finish(CountdownExit::Expired)
        } else {
            self.into()
        }
    }

    fn handle_pause(self, context: &mut CountdownContext<'_>) -> CountdownState {
        tracing::debug!(remaining = %self.remaining, "Countdown paused");
        context.observer.paused(true);
        PausedState {
            remaining: self.remaining,
        }
        .into()
    }

    fn handle_restart(mut self, context: &mut CountdownContext<'_>) -> CountdownState {
        tracing::debug!(duration = %context.target, "Countdown restarted");
        self.remaining = context.target;
        self.timer.reset();
        context.observer.tick(self.remaining);
        self.into()
    }

    fn finish(self, exit: CountdownExit) -> CountdownState {
        tracing::debug!(?exit, remaining = %self.remaining, "Countdown finished");
        FinishedState { exit }.into()
    }
}

/// A state which indicates that the countdown is paused. Only resume and
/// cancel are acted on, any further pause is ignored.
#[derive(Debug)]
pub struct PausedState {
    remaining: PhaseDuration,
}

impl StateRun for PausedState {
    async fn run(self, context: &mut CountdownContext<'_>) -> CountdownState {
        let controls = &mut *context.controls;
        tokio::select! {
            biased;
            Some(()) = controls.cancel.recv() => self.handle_cancel(),
            Some(()) = controls.pause.recv() => self.into(),
            Some(()) = controls.resume.recv() => self.handle_resume(context).await,
            // Nobody is left to resume the countdown.
            else => self.handle_cancel(),
        }
    }
}

impl PausedState {
    async fn handle_resume(self, context: &mut CountdownContext<'_>) -> CountdownState {
        tracing::debug!(remaining = %self.remaining, "Countdown resumed");
        context.observer.paused(false);
        CountdownState::start(self.remaining).await
    }

    fn handle_cancel(self) -> CountdownState {
        tracing::debug!(remaining = %self.remaining, "Countdown cancelled while paused");
        FinishedState {
            exit: CountdownExit::Cancelled,
        }
        .into()
    }
}

/// A state which indicates that the countdown exited.
#[derive(Debug)]
pub struct FinishedState {
    exit: CountdownExit,
}

impl StateRun for FinishedState {
    async fn run(self, _context: &mut CountdownContext<'_>) -> CountdownState {
        self.into()
    }
}

/// Create a one second ticker whose immediate first tick is already consumed.
async fn spawn_timer() -> Interval {
    let mut timer = tokio::time::interval(TICK);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer.tick().await;
    timer
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::Instant;

    use crate::domain::countdown::control;

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<PhaseDuration>,
        paused: Vec<bool>,
    }

    impl CountdownObserver for Recorder {
        fn tick(&mut self, remaining: PhaseDuration) {
            self.ticks.push(remaining);
        }

        fn paused(&mut self, paused: bool) {
            self.paused.push(paused);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_operation() {
        let start = Instant::now();
        let mut timer = spawn_timer().await;
        assert_eq!(Instant::now(), start);
        timer.tick().await;
        assert_eq!(start.elapsed(), TICK);
    }

    #[tokio::test(start_paused = true)]
    async fn running_state_handle_tick() {
        let (_sender, mut controls) = control::channel();
        let mut recorder = Recorder::default();
        let mut context = CountdownContext {
            target: PhaseDuration::from_secs(2),
            controls: &mut controls,
            observer: &mut recorder,
        };

        let state = CountdownState::start(PhaseDuration::from_secs(2)).await;
        let state = state.run(&mut context).await;
        assert!(matches!(state, CountdownState::Running(_)));
        let state = state.run(&mut context).await;
        assert_eq!(state.exit(), Some(CountdownExit::Expired));

        assert_eq!(
            recorder.ticks,
            vec![PhaseDuration::from_secs(1), PhaseDuration::ZERO]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn running_state_cancel_wins() {
        let (sender, mut controls) = control::channel();
        let mut recorder = Recorder::default();
        let mut context = CountdownContext {
            target: PhaseDuration::from_secs(5),
            controls: &mut controls,
            observer: &mut recorder,
        };

        sender.restart();
        sender.pause();
        sender.cancel();
        let state = CountdownState::start(PhaseDuration::from_secs(5)).await;
        let state = state.run(&mut context).await;
        assert_eq!(state.exit(), Some(CountdownExit::Cancelled));
        assert!(recorder.ticks.is_empty());
        assert!(recorder.paused.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_state_ignores_pause_and_skip() {
        let (sender, mut controls) = control::channel();
        let mut recorder = Recorder::default();
        let mut context = CountdownContext {
            target: PhaseDuration::from_secs(5),
            controls: &mut controls,
            observer: &mut recorder,
        };

        let state: CountdownState = PausedState {
            remaining: PhaseDuration::from_secs(3),
        }
        .into();
        sender.pause();
        let state = state.run(&mut context).await;
        assert!(matches!(state, CountdownState::Paused(_)));

        sender.skip();
        sender.resume();
        let state = state.run(&mut context).await;
        assert!(matches!(state, CountdownState::Running(_)));
        // The skip stays queued until the countdown runs again.
        let state = state.run(&mut context).await;
        assert_eq!(state.exit(), Some(CountdownExit::Skipped));
        assert_eq!(recorder.paused, vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_state_without_senders() {
        let (sender, mut controls) = control::channel();
        let mut recorder = Recorder::default();
        let mut context = CountdownContext {
            target: PhaseDuration::from_secs(5),
            controls: &mut controls,
            observer: &mut recorder,
        };

        drop(sender);
        let state: CountdownState = PausedState {
            remaining: PhaseDuration::from_secs(3),
        }
        .into();
        let state = state.run(&mut context).await;
        assert_eq!(state.exit(), Some(CountdownExit::Cancelled));
    }
}
