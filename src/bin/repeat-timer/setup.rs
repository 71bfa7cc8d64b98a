use std::sync::Arc;

use repeat_timer::domain::entity::ScheduleConfig;
use repeat_timer::domain::RepeatSchedule;
use repeat_timer::host::config::{self, Configuration};
use repeat_timer::host::{Console, NotifyService};
use snafu::{prelude::*, Whatever};
use tokio::io::Stdout;
use tracing::Level;

use crate::cli::Arguments;

const APP_NAME: &str = "repeat-timer";

pub fn bootstrap(args: &Arguments) -> Result<Console<Stdout>, Whatever> {
    let configuration = configuration(args)?;
    let schedule = schedule(args, &configuration)?;

    let console = Console::new(schedule, tokio::io::stdout());
    if args.no_notify || !configuration.notification.enabled {
        return Ok(console);
    }

    let notifier = Arc::new(NotifyService::new(APP_NAME.to_owned()));
    Ok(console.with_notifier(notifier, configuration.notification))
}

pub fn logger(verbosity: Level) -> Result<(), Whatever> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(verbosity)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .whatever_context("Could not setup logger")?;
    Ok(())
}

fn configuration(args: &Arguments) -> Result<Configuration, Whatever> {
    let res = match &args.config {
        Some(path) => config::load_with_path(path),
        None => config::load_with_xdg(APP_NAME),
    };

    res.whatever_context("Could not load configuration")
}

fn schedule(args: &Arguments, configuration: &Configuration) -> Result<RepeatSchedule, Whatever> {
    let mut config = ScheduleConfig::from(configuration.schedule.clone());
    if let Some(intervals) = args.intervals {
        config.work_intervals = intervals;
    }
    if let Some(work) = args.work {
        config.work_duration = work;
    }
    if let Some(rest) = args.rest {
        config.rest_duration = rest;
    }
    if args.rest_before_start {
        config.rest_before_start = true;
    }
    if args.no_rest {
        config.rest_enabled = false;
    }

    tracing::debug!(?config, "Schedule configured");
    RepeatSchedule::try_new(config).whatever_context("Invalid schedule")
}
