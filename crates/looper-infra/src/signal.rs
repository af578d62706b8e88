//! Interruptible sleeping between ticks.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Interrupted,
}

/// Waits between ticks and reports whether the run should stop.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration) -> Wake;

    /// Non-blocking check for a pending stop request.
    fn interrupted(&mut self) -> bool;
}

impl<T: Sleeper + ?Sized> Sleeper for &mut T {
    fn sleep(&mut self, duration: Duration) -> Wake {
        (**self).sleep(duration)
    }

    fn interrupted(&mut self) -> bool {
        (**self).interrupted()
    }
}

/// Sleeper woken by SIGINT/SIGTERM.
pub struct StopSignal {
    rx: Receiver<()>,
    stopped: bool,
}

impl StopSignal {
    /// Install the process-wide Ctrl-C/termination handler. Call once.
    pub fn install() -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })
        .context("install signal handler")?;
        Ok(Self::from_receiver(rx))
    }

    /// Wrap any channel; a message on it counts as a stop request.
    pub fn from_receiver(rx: Receiver<()>) -> Self {
        Self { rx, stopped: false }
    }
}

impl Sleeper for StopSignal {
    fn sleep(&mut self, duration: Duration) -> Wake {
        if self.stopped {
            return Wake::Interrupted;
        }
        match self.rx.recv_timeout(duration) {
            Ok(()) => {
                self.stopped = true;
                Wake::Interrupted
            }
            Err(RecvTimeoutError::Timeout) => Wake::Elapsed,
            Err(RecvTimeoutError::Disconnected) => {
                // No one can signal us any more; fall back to a plain sleep.
                std::thread::sleep(duration);
                Wake::Elapsed
            }
        }
    }

    fn interrupted(&mut self) -> bool {
        if !self.stopped {
            self.stopped = matches!(self.rx.try_recv(), Ok(()));
        }
        self.stopped
    }
}
