use std::fmt::{Display, Formatter, Result as FmtResult};

/// What a host displays before the first phase label arrives.
pub const STARTING_LABEL: &str = "Starting";

/// The segment of a schedule that is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Resting,
    /// `index` is 1-based and never exceeds `total`.
    Working {
        index: u32,
        total: u32,
    },
}

impl Phase {
    /// Returns `true` if this is a work interval.
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working { .. })
    }

    /// Human-readable label published when the phase starts.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Resting => f.write_str("Rest"),
            Self::Working { index, total } => write!(f, "Interval {index}/{total}"),
        }
    }
}
