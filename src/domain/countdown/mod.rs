pub mod control;
mod state;

pub use control::{ControlReceiver, ControlSender};

use crate::domain::entity::PhaseDuration;

use state::{CountdownContext, CountdownState, StateRun};

/// How an [`IntervalCountdown`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownExit {
    /// The remaining time ticked down to zero.
    Expired,
    Skipped,
    Cancelled,
}

/// Receives the progress of a running [`IntervalCountdown`].
pub trait CountdownObserver: Send {
    /// Called with the target on start and restart, and with the new
    /// remaining time after every tick.
    fn tick(&mut self, remaining: PhaseDuration);

    /// Called when the countdown gets paused or resumed.
    fn paused(&mut self, _paused: bool) {}
}

impl<F> CountdownObserver for F
where
    F: FnMut(PhaseDuration) + Send,
{
    fn tick(&mut self, remaining: PhaseDuration) {
        self(remaining)
    }
}

/// A single countdown from a target duration down to zero, one tick per
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalCountdown {
    target: PhaseDuration,
}

impl IntervalCountdown {
    /// Creates a new [`IntervalCountdown`].
    pub fn new(target: PhaseDuration) -> Self {
        Self { target }
    }

    pub fn target(&self) -> PhaseDuration {
        self.target
    }

    /// Count down until the target expires, or a skip or cancel signal
    /// arrives. The target itself is published first, so an N second target
    /// publishes N + 1 values and takes N seconds.
    ///
    /// Nothing is published when the countdown gets skipped or cancelled, and
    /// a cancel pending on entry returns before the target is published.
    pub async fn run<O>(&self, controls: &mut ControlReceiver, observer: &mut O) -> CountdownExit
    where
        O: CountdownObserver,
    {
        controls.discard_transient();
        if controls.take_cancel() {
            tracing::debug!(duration = %self.target, "Countdown cancelled before start");
            return CountdownExit::Cancelled;
        }
        observer.tick(self.target);
        if self.target.is_zero() {
            return CountdownExit::Expired;
        }

        let mut context = CountdownContext {
            target: self.target,
            controls,
            observer,
        };
        let mut state = CountdownState::start(self.target).await;
        loop {
            if let Some(exit) = state.exit() {
                return exit;
            }
            state = state.run(&mut context).await;
        }
    }
}
