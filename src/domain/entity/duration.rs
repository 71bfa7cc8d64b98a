use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use snafu::prelude::*;

/// A whole number of minutes and seconds. Seconds always stay within
/// `0..=59`, any overflow is carried into minutes when constructing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "RawPhaseDuration")]
pub struct PhaseDuration {
    minutes: u64,
    seconds: u64,
}

impl PhaseDuration {
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
    };

    /// Creates a normalized [`PhaseDuration`], so `new(0, 90)` equals
    /// `new(1, 30)`. Minutes saturate at `u64::MAX`.
    pub const fn new(minutes: u64, seconds: u64) -> Self {
        Self {
            minutes: minutes.saturating_add(seconds / 60),
            seconds: seconds % 60,
        }
    }

    /// Creates a [`PhaseDuration`] from a total number of seconds.
    pub const fn from_secs(seconds: u64) -> Self {
        Self::new(0, seconds)
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Saturates at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// Step one second towards zero, borrowing a minute when the seconds
    /// part is already zero. Stays at zero.
    pub fn decrement(&mut self) {
        match (self.minutes, self.seconds) {
            (0, 0) => {}
            (_, 0) => {
                self.minutes -= 1;
                self.seconds = 59;
            }
            _ => self.seconds -= 1,
        }
    }
}

impl From<PhaseDuration> for Duration {
    fn from(value: PhaseDuration) -> Self {
        Duration::from_secs(value.total_seconds())
    }
}

impl Display for PhaseDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for PhaseDuration {
    type Err = ParsePhaseDurationError;

    /// Parse either `MM:SS` or a plain number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ensure!(!s.is_empty(), EmptySnafu);

        let parse = |part: &str| {
            part.trim().parse::<u64>().context(NumberSnafu {
                input: s.to_owned(),
            })
        };

        match s.split_once(':') {
            Some((minutes, seconds)) => {
                let (minutes, seconds) = (parse(minutes)?, parse(seconds)?);
                let total = minutes.checked_mul(60).and_then(|m| m.checked_add(seconds));
                ensure!(total.is_some(), OutOfRangeSnafu { input: s });
                Ok(Self::new(minutes, seconds))
            }
            None => Ok(Self::from_secs(parse(s)?)),
        }
    }
}

#[derive(Deserialize)]
struct RawPhaseDuration {
    #[serde(default)]
    minutes: u64,
    #[serde(default)]
    seconds: u64,
}

impl From<RawPhaseDuration> for PhaseDuration {
    fn from(raw: RawPhaseDuration) -> Self {
        Self::new(raw.minutes, raw.seconds)
    }
}

/// An error type of parsing a [`PhaseDuration`] from text.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParsePhaseDurationError {
    #[snafu(display("Duration must not be empty"))]
    #[non_exhaustive]
    Empty,
    #[snafu(display("Could not parse {input:?} as MM:SS or seconds"))]
    #[non_exhaustive]
    Number {
        input: String,
        source: ParseIntError,
    },
    #[snafu(display("Duration {input:?} is too long"))]
    #[non_exhaustive]
    OutOfRange { input: String },
}
