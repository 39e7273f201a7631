//! Error type and reset-cause capture

use core::fmt;
use ufmt::derive::uDebug;

/// MCUSR flag bits
const PORF: u8 = 1 << 0;
const EXTRF: u8 = 1 << 1;
const BORF: u8 = 1 << 2;
const WDRF: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
pub enum Error {
    /// ADSC never cleared within the polling bound
    ConversionTimeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConversionTimeout => f.write_str("ADC conversion did not complete"),
        }
    }
}

/// Snapshot of MCUSR taken at boot, before the flags are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, uDebug)]
pub struct ResetCause {
    flags: u8,
}

impl ResetCause {
    pub const fn from_bits(flags: u8) -> Self {
        Self { flags: flags & (PORF | EXTRF | BORF | WDRF) }
    }

    pub const fn power_on(self) -> bool {
        self.flags & PORF != 0
    }

    pub const fn watchdog(self) -> bool {
        self.flags & WDRF != 0
    }
}
