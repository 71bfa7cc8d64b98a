pub mod countdown;
pub mod entity;
pub mod schedule;

pub use countdown::{CountdownExit, CountdownObserver, IntervalCountdown};
pub use schedule::{
    PhaseFinished, RepeatSchedule, RunOutcome, RunStatus, ScheduleEvents, ScheduleHandle,
    ScheduleRun, ScheduleState,
};
