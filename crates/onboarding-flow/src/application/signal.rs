//! Single-shot advance signal between a step and the sequencer.

use onboarding_core::error::SignalError;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::SignalDropped;

/// Sending half, held by the active step's presenter.
#[derive(Debug)]
pub struct AdvanceSignal {
    sender: Mutex<Option<oneshot::Sender<()>>>,
}

/// Receiving half, awaited by the sequencer.
#[derive(Debug)]
pub struct AdvanceWaiter {
    receiver: oneshot::Receiver<()>,
}

/// Creates a connected signal/waiter pair.
#[must_use]
pub fn advance_channel() -> (AdvanceSignal, AdvanceWaiter) {
    let (sender, receiver) = oneshot::channel();
    (
        AdvanceSignal {
            sender: Mutex::new(Some(sender)),
        },
        AdvanceWaiter { receiver },
    )
}

impl AdvanceSignal {
    /// Resolves the signal.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::AlreadyResolved` on every call after the first.
    pub fn resolve(&self) -> Result<(), SignalError> {
        let sender = self
            .sender
            .lock()
            .take()
            .ok_or(SignalError::AlreadyResolved)?;
        // A closed receiver means the run was abandoned; nothing to wake.
        let _ = sender.send(());
        Ok(())
    }

    /// Whether [`AdvanceSignal::resolve`] has already succeeded.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl AdvanceWaiter {
    /// Suspends until the signal is resolved.
    ///
    /// # Errors
    ///
    /// Returns `SignalDropped` if the signal is dropped unresolved.
    pub async fn wait(self) -> Result<(), SignalDropped> {
        self.receiver.await.map_err(|_| SignalDropped)
    }
}

#[cfg(test)]
mod tests {
    use onboarding_core::error::SignalError;

    use super::*;

    #[tokio::test]
    async fn test_resolve_wakes_waiter() {
        let (signal, waiter) = advance_channel();

        signal.resolve().unwrap();

        assert!(signal.is_resolved());
        assert_eq!(waiter.wait().await, Ok(()));
    }

    #[test]
    fn test_second_resolve_is_rejected() {
        let (signal, _waiter) = advance_channel();

        let first = signal.resolve();
        let second = signal.resolve();

        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(SignalError::AlreadyResolved));
    }

    #[tokio::test]
    async fn test_dropped_signal_fails_waiter() {
        let (signal, waiter) = advance_channel();

        drop(signal);

        assert_eq!(waiter.wait().await, Err(SignalDropped));
    }

    #[test]
    fn test_resolve_after_waiter_is_gone_still_succeeds_once() {
        let (signal, waiter) = advance_channel();
        drop(waiter);

        assert_eq!(signal.resolve(), Ok(()));
        assert_eq!(signal.resolve(), Err(SignalError::AlreadyResolved));
    }
}
