use std::collections::VecDeque;
use std::io::Error as IoError;
use std::str::FromStr;
use std::sync::Arc;

use snafu::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinError;

use crate::domain::entity::{PhaseDuration, STARTING_LABEL};
use crate::domain::schedule::{
    PhaseFinished, RepeatSchedule, RunOutcome, ScheduleEvents, ScheduleHandle, ScheduleRun,
    ScheduleState,
};
use crate::host::config::NotificationContent;
use crate::host::notify::{NotifyPort, NotifyRequest};
use crate::tracing_report;

const HELP: &str = "p: pause, r: resume, s: skip, t: restart, c: cancel, q: status";

/// A command typed into the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Pause,
    Resume,
    Skip,
    Restart,
    Cancel,
    Status,
}

impl FromStr for ConsoleCommand {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(Self::Pause),
            "r" | "resume" => Ok(Self::Resume),
            "s" | "skip" => Ok(Self::Skip),
            "t" | "restart" => Ok(Self::Restart),
            "c" | "cancel" => Ok(Self::Cancel),
            "q" | "status" => Ok(Self::Status),
            _ => UnknownCommandSnafu { input: s.trim() }.fail(),
        }
    }
}

/// Terminal front end of a [`RepeatSchedule`]. It turns input lines into
/// control calls, renders the event streams and fires notifications.
pub struct Console<W> {
    schedule: RepeatSchedule,
    output: W,
    notifier: Option<Arc<dyn NotifyPort>>,
    notification: NotificationContent,
    label: String,
    /// Labels received before the first time value of their phase.
    pending_labels: VecDeque<String>,
    last_remaining: Option<PhaseDuration>,
}

impl<W> Console<W>
where
    W: AsyncWrite + Unpin,
{
    /// Creates a new [`Console`] without notifications.
    pub fn new(schedule: RepeatSchedule, output: W) -> Self {
        Self {
            schedule,
            output,
            notifier: None,
            notification: NotificationContent::default(),
            label: STARTING_LABEL.to_owned(),
            pending_labels: VecDeque::new(),
            last_remaining: None,
        }
    }

    /// Notify through `notifier` whenever a phase or the whole run finished.
    pub fn with_notifier(
        mut self,
        notifier: Arc<dyn NotifyPort>,
        notification: NotificationContent,
    ) -> Self {
        self.notifier = Some(notifier);
        self.notification = notification;
        self
    }

    /// Returns a reference to the output of this [`Console`].
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Start a run and drive it until it completes or gets cancelled. When
    /// the input ends the run continues without further commands.
    ///
    /// # Errors
    ///
    /// This function will return an error if reading input or writing output
    /// fails, or the run task panicked.
    pub async fn run<R>(&mut self, input: R) -> Result<RunOutcome, ConsoleError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.label = STARTING_LABEL.to_owned();
        self.pending_labels.clear();
        self.last_remaining = None;
        self.write(&format!("{HELP}\n{STARTING_LABEL}")).await?;

        let ScheduleRun { handle, events } = self.schedule.start();
        let ScheduleEvents {
            mut time_remaining,
            mut phase_label,
            mut phase_finished,
            mut completion,
        } = events;
        let mut lines = input.lines();
        let mut input_open = true;

        let outcome = loop {
            tokio::select! {
                biased;
                Some(label) = phase_label.recv() => self.pending_labels.push_back(label),
                Some(finished) = phase_finished.recv() => self.phase_finished(finished).await,
                Some(remaining) = time_remaining.recv() => self.show_remaining(remaining).await?,
                line = lines.next_line(), if input_open => match line.context(ReadSnafu)? {
                    Some(line) => self.command(&handle, &line).await?,
                    None => {
                        tracing::debug!("Console input closed");
                        input_open = false;
                    }
                },
                outcome = &mut completion => break outcome.context(JoinSnafu)?,
            }
        };

        while let Ok(remaining) = time_remaining.try_recv() {
            self.show_remaining(remaining).await?;
        }
        self.finish(outcome).await?;
        Ok(outcome)
    }

    async fn command(&mut self, handle: &ScheduleHandle, line: &str) -> Result<(), ConsoleError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        match line.parse::<ConsoleCommand>() {
            Ok(command) => {
                tracing::debug!(?command, "Console command");
                match command {
                    ConsoleCommand::Pause => handle.pause(),
                    ConsoleCommand::Resume => handle.resume(),
                    ConsoleCommand::Skip => handle.skip(),
                    ConsoleCommand::Restart => handle.restart(),
                    ConsoleCommand::Cancel => handle.cancel(),
                    ConsoleCommand::Status => self.show_status(handle).await?,
                }
                Ok(())
            }
            Err(err) => self.write(&format!("\n{err} ({HELP})")).await,
        }
    }

    /// Render a time value on the current line. Within a phase the values
    /// only go down, so a value that is not lower than the previous one
    /// starts the phase of the next pending label. A restart without a
    /// pending label stays on the same line.
    async fn show_remaining(&mut self, remaining: PhaseDuration) -> Result<(), ConsoleError> {
        let starts_phase = self.last_remaining.map_or(true, |last| remaining >= last);
        self.last_remaining = Some(remaining);
        if starts_phase {
            if let Some(label) = self.pending_labels.pop_front() {
                self.label = label;
                self.write("\n").await?;
            }
        }

        let line = format!("\r{}  {remaining}", self.label);
        self.write(&line).await
    }

    async fn show_status(&mut self, handle: &ScheduleHandle) -> Result<(), ConsoleError> {
        let status = handle.status();
        let state = match status.state {
            ScheduleState::Idle => STARTING_LABEL.to_owned(),
            ScheduleState::Running(phase) => phase.label(),
            ScheduleState::Done(outcome) => format!("{outcome:?}"),
        };
        let paused = if status.paused { " (paused)" } else { "" };
        let line = format!(
            "\nphase {} {state}  {}{paused}\n",
            status.phase_number, status.remaining
        );
        self.write(&line).await
    }

    async fn phase_finished(&mut self, finished: PhaseFinished) {
        tracing::debug!(?finished, "Phase finished");
        let summary = if finished.skipped {
            format!("{} skipped", finished.phase)
        } else {
            format!("{} finished", finished.phase)
        };
        self.notify(NotifyRequest {
            summary,
            body: None,
        })
        .await;
    }

    async fn finish(&mut self, outcome: RunOutcome) -> Result<(), ConsoleError> {
        match outcome {
            RunOutcome::Completed => {
                let summary = self.notification.run_summary.clone();
                self.write(&format!("\n{summary}\n")).await?;
                self.notify(NotifyRequest {
                    summary,
                    body: self.notification.run_body.clone(),
                })
                .await;
            }
            RunOutcome::Cancelled => self.write("\nCancelled\n").await?,
        }
        Ok(())
    }

    async fn notify(&self, request: NotifyRequest) {
        if !self.notification.enabled {
            return;
        }
        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.notify(request).await {
                tracing_report!(err);
            }
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output
            .write_all(text.as_bytes())
            .await
            .context(WriteSnafu)?;
        self.output.flush().await.context(WriteSnafu)
    }
}

/// An error type of parsing a [`ConsoleCommand`].
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(display("Unknown command {input:?}"))]
pub struct UnknownCommandError {
    input: String,
}

/// An error type of driving a run from the console.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ConsoleError {
    #[snafu(display("Could not read console input"))]
    Read { source: IoError },
    #[snafu(display("Could not write console output"))]
    Write { source: IoError },
    #[snafu(display("Schedule task ended abnormally"))]
    Join { source: JoinError },
}
