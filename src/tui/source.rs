use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crate::core::event::InputEvent;
use crate::core::input::InputSource;

use super::crossterm::into_input_event;
use super::terminal_guard::TerminationSignal;

/// Live terminal input. A pending termination signal wins over keyboard and
/// mouse events and is reported as [`InputEvent::Interrupt`].
#[derive(Debug, Default)]
pub struct CrosstermSource {
    signals: Option<Receiver<TerminationSignal>>,
}

impl CrosstermSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signals(signals: Receiver<TerminationSignal>) -> Self {
        Self {
            signals: Some(signals),
        }
    }

    fn pending_signal(&mut self) -> Option<TerminationSignal> {
        let rx = self.signals.as_ref()?;
        match rx.try_recv() {
            Ok(sig) => Some(sig),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.signals = None;
                None
            }
        }
    }
}

impl InputSource for CrosstermSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if let Some(sig) = self.pending_signal() {
            tracing::debug!(signal = ?sig, "interrupting input loop");
            return Ok(Some(InputEvent::Interrupt));
        }
        if !crossterm::event::poll(timeout)? {
            return Ok(None);
        }
        Ok(into_input_event(crossterm::event::read()?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tui/source.rs"]
mod tests;
