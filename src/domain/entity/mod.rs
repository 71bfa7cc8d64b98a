pub mod config;
pub mod duration;
pub mod phase;

pub use config::{InvalidScheduleError, ScheduleConfig, MAX_WORK_INTERVALS};
pub use duration::{ParsePhaseDurationError, PhaseDuration};
pub use phase::{Phase, STARTING_LABEL};
