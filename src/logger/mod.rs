//! Event logging for the firefly state machine
//!
//! The ATtiny13A has no UART, so firmware builds log into [`NullLogger`] and
//! the calls compile away. Anything that implements [`ufmt::uWrite`] (a
//! bit-banged serial line, a host-side buffer) can be plugged in through
//! [`UfmtLogger`] instead.

use crate::diagnostics::{Error, ResetCause};
use ufmt::{derive::uDebug, uWrite, uwriteln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
pub enum Event {
    Boot(ResetCause),
    /// A watchdog tick woke the core
    Woke { remaining: u8 },
    /// Raw light level measured on the LED
    Sensed(u16),
    Blink,
    Rescheduled(u8),
    Fault(Error),
}

pub trait Logger {
    fn log(&mut self, event: Event);
}

pub struct NullLogger;

impl Logger for NullLogger {
    #[inline(always)]
    fn log(&mut self, _event: Event) {}
}

/// Writes one line per event, formatted with `uDebug`.
pub struct UfmtLogger<W> {
    writer: W,
}

impl<W: uWrite> UfmtLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: uWrite> Logger for UfmtLogger<W> {
    fn log(&mut self, event: Event) {
        // A logger that cannot write has nowhere to report it
        uwriteln!(self.writer, "[fly] {:?}", event).ok();
    }
}
