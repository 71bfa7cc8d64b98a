use std::path::PathBuf;

use clap::Parser;
use repeat_timer::domain::entity::PhaseDuration;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    /// Path to a custom configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of work intervals (1-99)
    #[arg(short, long)]
    pub intervals: Option<u32>,
    /// Length of each work interval, as MM:SS or seconds
    #[arg(short, long)]
    pub work: Option<PhaseDuration>,
    /// Length of each rest, as MM:SS or seconds
    #[arg(short, long)]
    pub rest: Option<PhaseDuration>,
    /// Rest once before the first work interval
    #[arg(long)]
    pub rest_before_start: bool,
    /// Run the work intervals back to back
    #[arg(long, conflicts_with = "rest_before_start")]
    pub no_rest: bool,
    /// Don't show desktop notifications
    #[arg(long)]
    pub no_notify: bool,
    /// Maximum logging level the subscriber should use
    #[arg(short, long, default_value_t = Level::WARN)]
    pub verbosity: Level,
}
