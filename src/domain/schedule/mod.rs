mod handle;
mod routine;

pub use handle::{
    PhaseFinished, RunOutcome, RunStatus, ScheduleEvents, ScheduleHandle, ScheduleRun,
    ScheduleState,
};

use tokio::sync::{mpsc, watch};

use crate::domain::countdown::control;
use crate::domain::entity::{InvalidScheduleError, ScheduleConfig};

use routine::{Outputs, ScheduleContext, ScheduleRoutine};

/// Upper bound of the time remaining buffer sized from the schedule.
const MAX_TIME_CAPACITY: usize = 1 << 20;

/// A validated work/rest schedule which can be started any number of times.
/// Every start gets its own run state and channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatSchedule {
    config: ScheduleConfig,
    event_capacity: Option<usize>,
}

impl RepeatSchedule {
    /// Try to create a [`RepeatSchedule`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the configuration is invalid.
    pub fn try_new(config: ScheduleConfig) -> Result<Self, InvalidScheduleError> {
        config.validate()?;
        Ok(Self {
            config,
            event_capacity: None,
        })
    }

    /// Use a fixed buffer size for every event stream instead of one sized to
    /// hold a whole run.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity.max(1));
        self
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Spawn a new run on background.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start(&self) -> ScheduleRun {
        let phases = self.config.phases().len();
        let (time_capacity, phase_capacity) = match self.event_capacity {
            Some(capacity) => (capacity, capacity),
            None => {
                // Every phase publishes its target plus one value per second,
                // and a cancel adds up to two zeros.
                let seconds = usize::try_from(self.config.total_seconds()).unwrap_or(usize::MAX);
                let ticks = seconds.saturating_add(phases + 2).min(MAX_TIME_CAPACITY);
                (ticks, phases + 1)
            }
        };

        let (time_tx, time_rx) = mpsc::channel(time_capacity);
        let (label_tx, label_rx) = mpsc::channel(phase_capacity);
        let (finished_tx, finished_rx) = mpsc::channel(phase_capacity);
        let (status_tx, status_rx) = watch::channel(RunStatus::idle());
        let (controls_tx, controls_rx) = control::channel();

        let handle = ScheduleHandle::new(controls_tx, time_tx.clone(), status_rx);
        let completion = ScheduleRoutine::spawn(ScheduleContext {
            config: self.config.clone(),
            controls: controls_rx,
            outputs: Outputs {
                time_remaining: time_tx,
                phase_label: label_tx,
                phase_finished: finished_tx,
            },
            status: status_tx,
        });

        ScheduleRun {
            handle,
            events: ScheduleEvents {
                time_remaining: time_rx,
                phase_label: label_rx,
                phase_finished: finished_rx,
                completion,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc::Receiver;
    use tokio::time::{sleep, Duration, Instant};

    use crate::domain::entity::{Phase, PhaseDuration};

    fn config(work_intervals: u32) -> ScheduleConfig {
        ScheduleConfig {
            work_intervals,
            work_duration: PhaseDuration::from_secs(5),
            rest_duration: PhaseDuration::from_secs(2),
            rest_before_start: true,
            rest_enabled: true,
        }
    }

    fn drain<T>(receiver: &mut Receiver<T>) -> Vec<T> {
        let mut values = Vec::new();
        while let Ok(value) = receiver.try_recv() {
            values.push(value);
        }
        values
    }

    #[test]
    fn repeat_schedule_rejects_invalid_config() {
        assert_eq!(
            RepeatSchedule::try_new(config(0)),
            Err(InvalidScheduleError::NoIntervals)
        );
        assert!(RepeatSchedule::try_new(config(2)).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_full_run() {
        let schedule = RepeatSchedule::try_new(config(2)).unwrap();
        let start = Instant::now();
        let ScheduleRun { handle, mut events } = schedule.start();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_secs(14));

        assert_eq!(
            drain(&mut events.phase_label),
            vec!["Rest", "Interval 1/2", "Rest", "Interval 2/2"]
        );

        let finished = drain(&mut events.phase_finished);
        assert_eq!(finished.len(), 4);
        assert!(finished.iter().all(|event| !event.skipped));
        assert_eq!(
            finished[3],
            PhaseFinished {
                phase: Phase::Working { index: 2, total: 2 },
                phase_number: 4,
                skipped: false,
            }
        );

        // Every phase publishes its target and one value per second.
        let remaining = drain(&mut events.time_remaining);
        assert_eq!(remaining.len(), 14 + 4);
        assert_eq!(remaining.last(), Some(&PhaseDuration::ZERO));

        let status = handle.status();
        assert_eq!(status.state, ScheduleState::Done(RunOutcome::Completed));
        assert_eq!(status.phase_number, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_cancel_in_second_rest() {
        let schedule = RepeatSchedule::try_new(config(2)).unwrap();
        let ScheduleRun { handle, mut events } = schedule.start();

        // Rest (2s) + Interval 1/2 (5s) + one second into the second rest.
        sleep(Duration::from_millis(8500)).await;
        assert_eq!(handle.status().state, ScheduleState::Running(Phase::Resting));
        assert_eq!(handle.status().phase_number, 3);
        handle.cancel();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);

        let labels = drain(&mut events.phase_label);
        assert_eq!(labels, vec!["Rest", "Interval 1/2", "Rest"]);
        assert!(!labels.iter().any(|label| label == "Interval 2/2"));

        // The cancelled rest never reports as finished.
        assert_eq!(drain(&mut events.phase_finished).len(), 2);
        let remaining = drain(&mut events.time_remaining);
        assert_eq!(remaining.last(), Some(&PhaseDuration::ZERO));
        assert_eq!(handle.status().remaining, PhaseDuration::ZERO);

        // Control calls after the run are no-ops.
        handle.skip();
        handle.resume();
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_skip_counts_as_finished() {
        let schedule = RepeatSchedule::try_new(config(1)).unwrap();
        let start = Instant::now();
        let ScheduleRun { handle, mut events } = schedule.start();

        sleep(Duration::from_millis(500)).await;
        handle.skip();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_millis(5500));

        let finished = drain(&mut events.phase_finished);
        assert_eq!(finished.len(), 2);
        assert!(finished[0].skipped);
        assert_eq!(finished[0].phase, Phase::Resting);
        assert!(!finished[1].skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_pause_and_resume() {
        let schedule = RepeatSchedule::try_new(config(1)).unwrap();
        let start = Instant::now();
        let ScheduleRun { mut handle, mut events } = schedule.start();

        sleep(Duration::from_millis(3500)).await;
        handle.pause();
        while !handle.status().paused {
            assert!(handle.changed().await);
        }
        let paused_at = handle.status().remaining;
        assert_eq!(paused_at, PhaseDuration::from_secs(4));

        sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.status().remaining, paused_at);
        handle.pause();
        handle.resume();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_millis(37500));
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_cancel_before_first_phase() {
        let mut config = config(2);
        config.rest_duration = PhaseDuration::ZERO;
        let schedule = RepeatSchedule::try_new(config).unwrap();
        let start = Instant::now();

        let ScheduleRun { handle, mut events } = schedule.start();
        handle.cancel();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(drain(&mut events.phase_label).is_empty());
        assert!(drain(&mut events.phase_finished).is_empty());
        assert!(drain(&mut events.time_remaining)
            .iter()
            .all(|remaining| remaining.is_zero()));

        let status = handle.status();
        assert_eq!(status.state, ScheduleState::Done(RunOutcome::Cancelled));
        assert_eq!(status.phase_number, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_zero_length_rest() {
        let mut config = config(2);
        config.rest_duration = PhaseDuration::ZERO;
        let schedule = RepeatSchedule::try_new(config).unwrap();

        let ScheduleRun { handle, mut events } = schedule.start();
        // Interval 1/2 runs from 0s to 5s, the rest after it takes no time.
        sleep(Duration::from_millis(2500)).await;
        handle.cancel();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(drain(&mut events.phase_label), vec!["Rest", "Interval 1/2"]);
        // Only the zero-length rest before the first interval finished.
        let finished = drain(&mut events.phase_finished);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].phase, Phase::Resting);
        assert_eq!(drain(&mut events.time_remaining).last(), Some(&PhaseDuration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_runs_are_isolated() {
        let schedule = RepeatSchedule::try_new(config(1)).unwrap();

        let first = schedule.start();
        first.handle.cancel();
        assert_eq!(
            first.events.completion.await.unwrap(),
            RunOutcome::Cancelled
        );

        let second = schedule.start();
        assert_eq!(second.handle.status().state, ScheduleState::Idle);
        assert_eq!(
            second.events.completion.await.unwrap(),
            RunOutcome::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_huge_durations() {
        let mut config = config(99);
        config.work_duration = PhaseDuration::new(u64::MAX, 59);
        let schedule = RepeatSchedule::try_new(config).unwrap();

        let ScheduleRun { handle, mut events } = schedule.start();
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.status().phase_number, 2);
        handle.cancel();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_schedule_drops_newest_on_full_buffer() {
        let schedule = RepeatSchedule::try_new(config(1))
            .unwrap()
            .with_event_capacity(3);
        let ScheduleRun { handle: _handle, mut events } = schedule.start();

        let outcome = (&mut events.completion).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        // The first rest publishes 2, 1, 0 and fills the buffer.
        assert_eq!(
            drain(&mut events.time_remaining),
            vec![
                PhaseDuration::from_secs(2),
                PhaseDuration::from_secs(1),
                PhaseDuration::ZERO,
            ]
        );
        assert_eq!(drain(&mut events.phase_label), vec!["Rest", "Interval 1/1"]);
    }
}
