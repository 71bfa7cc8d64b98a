use snafu::prelude::*;

use crate::domain::entity::{Phase, PhaseDuration};

/// Largest number of work intervals a schedule may contain.
pub const MAX_WORK_INTERVALS: u32 = 99;

/// Everything needed to derive the phases of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub work_intervals: u32,
    pub work_duration: PhaseDuration,
    pub rest_duration: PhaseDuration,
    pub rest_before_start: bool,
    /// Without rest every work interval directly follows the previous one.
    pub rest_enabled: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            work_intervals: 1,
            work_duration: PhaseDuration::from_secs(30),
            rest_duration: PhaseDuration::from_secs(5),
            rest_before_start: false,
            rest_enabled: true,
        }
    }
}

impl ScheduleConfig {
    /// Check that the configuration describes a runnable schedule.
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of work intervals is
    /// zero or greater than [`MAX_WORK_INTERVALS`].
    pub fn validate(&self) -> Result<(), InvalidScheduleError> {
        ensure!(self.work_intervals >= 1, NoIntervalsSnafu);
        ensure!(
            self.work_intervals <= MAX_WORK_INTERVALS,
            TooManyIntervalsSnafu {
                count: self.work_intervals,
            }
        );
        Ok(())
    }

    /// The ordered phases of a run. Working and resting strictly alternate and
    /// the run ends right after the last work interval.
    pub fn phases(&self) -> Vec<Phase> {
        let total = self.work_intervals;
        let mut phases = Vec::new();

        if self.rest_enabled && self.rest_before_start {
            phases.push(Phase::Resting);
        }
        for index in 1..=total {
            phases.push(Phase::Working { index, total });
            if self.rest_enabled && index < total {
                phases.push(Phase::Resting);
            }
        }

        phases
    }

    /// Get the duration corresponding to phase.
    pub fn duration(&self, phase: Phase) -> PhaseDuration {
        match phase {
            Phase::Resting => self.rest_duration,
            Phase::Working { .. } => self.work_duration,
        }
    }

    /// Number of seconds a run takes without any control input. Saturates at
    /// `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.phases()
            .into_iter()
            .map(|phase| self.duration(phase).total_seconds())
            .fold(0, u64::saturating_add)
    }
}

/// An error type of validating a [`ScheduleConfig`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidScheduleError {
    #[snafu(display("A schedule needs at least one work interval"))]
    #[non_exhaustive]
    NoIntervals,
    #[snafu(display("A schedule allows at most {MAX_WORK_INTERVALS} work intervals, got {count}"))]
    #[non_exhaustive]
    TooManyIntervals { count: u32 },
}
