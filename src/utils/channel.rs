use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

/// Send without waiting. When the buffer is full the new value is dropped,
/// when the receiver is gone it is discarded silently.
///
/// Returns `true` if the value was queued.
pub fn offer<T>(sender: &Sender<T>, value: T) -> bool {
    match sender.try_send(value) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::trace!(
                capacity = sender.max_capacity(),
                "Output buffer is full, dropped the newest value"
            );
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}
