use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// Creates the five control channels of one run. Every operation has its own
/// channel so a pending pause can never hide a pending cancel.
pub fn channel() -> (ControlSender, ControlReceiver) {
    let (pause, pause_rx) = mpsc::channel(1);
    let (resume, resume_rx) = mpsc::channel(1);
    let (skip, skip_rx) = mpsc::channel(1);
    let (restart, restart_rx) = mpsc::channel(1);
    let (cancel, cancel_rx) = mpsc::channel(1);

    let sender = ControlSender {
        pause,
        resume,
        skip,
        restart,
        cancel,
    };
    let receiver = ControlReceiver {
        pause: pause_rx,
        resume: resume_rx,
        skip: skip_rx,
        restart: restart_rx,
        cancel: cancel_rx,
    };
    (sender, receiver)
}

/// Sending half of the control channels. All operations return immediately:
/// a signal that is already pending, or that nobody listens to anymore, is
/// dropped.
#[derive(Debug, Clone)]
pub struct ControlSender {
    pause: Sender<()>,
    resume: Sender<()>,
    skip: Sender<()>,
    restart: Sender<()>,
    cancel: Sender<()>,
}

impl ControlSender {
    pub fn pause(&self) {
        signal(&self.pause, "pause");
    }

    pub fn resume(&self) {
        signal(&self.resume, "resume");
    }

    pub fn skip(&self) {
        signal(&self.skip, "skip");
    }

    pub fn restart(&self) {
        signal(&self.restart, "restart");
    }

    pub fn cancel(&self) {
        signal(&self.cancel, "cancel");
    }
}

fn signal(sender: &Sender<()>, name: &'static str) {
    match sender.try_send(()) {
        Ok(()) => tracing::trace!(signal = name, "Sent control signal"),
        Err(TrySendError::Full(())) => {
            tracing::trace!(signal = name, "Control signal is already pending")
        }
        Err(TrySendError::Closed(())) => {
            tracing::debug!(signal = name, "Dropped control signal, no run is listening")
        }
    }
}

/// Receiving half of the control channels, owned by the running task.
#[derive(Debug)]
pub struct ControlReceiver {
    pub(super) pause: Receiver<()>,
    pub(super) resume: Receiver<()>,
    pub(super) skip: Receiver<()>,
    pub(super) restart: Receiver<()>,
    pub(super) cancel: Receiver<()>,
}

impl ControlReceiver {
    /// Take a pending cancel without waiting.
    pub(crate) fn take_cancel(&mut self) -> bool {
        self.cancel.try_recv().is_ok()
    }

    /// Drop skip and restart requests which were meant for an earlier
    /// countdown. Pause and cancel carry over.
    pub(super) fn discard_transient(&mut self) {
        while self.skip.try_recv().is_ok() {
            tracing::trace!("Discarded stale skip signal");
        }
        while self.restart.try_recv().is_ok() {
            tracing::trace!("Discarded stale restart signal");
        }
    }
}
