/// WDTCR bit positions
pub const WDTIF: u8 = 1 << 7;
pub const WDTIE: u8 = 1 << 6;
pub const WDP3: u8 = 1 << 5;
pub const WDCE: u8 = 1 << 4;
pub const WDE: u8 = 1 << 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0,
    Ms32 = 1,
    Ms64 = 2,
    Ms125 = 3,
    Ms250 = 4,
    Ms500 = 5,
    Ms1000 = 6,
    Ms2000 = 7,
    Ms4000 = 8,
    Ms8000 = 9,
}

impl WatchdogTimeout {
    /// Prescaler bits as laid out in WDTCR (WDP3 is not adjacent to WDP2..0)
    #[inline]
    pub const fn wdtcr_bits(self) -> u8 {
        let wdp = self as u8;
        (wdp & 0x07) | if wdp & 0x08 != 0 { WDP3 } else { 0 }
    }
}

/// What the watchdog does when its period elapses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogMode {
    Stopped,
    Interrupt,
    Reset,
    InterruptAndReset,
}

impl WatchdogMode {
    pub const fn from_wdtcr(bits: u8) -> Self {
        match (bits & WDE != 0, bits & WDTIE != 0) {
            (false, false) => WatchdogMode::Stopped,
            (false, true) => WatchdogMode::Interrupt,
            (true, false) => WatchdogMode::Reset,
            (true, true) => WatchdogMode::InterruptAndReset,
        }
    }

    /// True if an expiry in this mode would reset the chip
    pub const fn resets(self) -> bool {
        matches!(self, WatchdogMode::Reset | WatchdogMode::InterruptAndReset)
    }
}

/// Watchdog timer used as a periodic wake alarm.
pub trait Watchdog {
    /// Load the timeout with WDE cleared, through the WDCE/WDE timed sequence.
    fn start_interrupt(&mut self, timeout: WatchdogTimeout);
    /// Clear a pending WDTIF and set WDTIE in one write.
    fn arm_interrupt(&mut self);
    /// Restart the elapsed-time counter (`wdr`).
    fn feed(&mut self);
    /// Stop the watchdog through the WDCE/WDE timed sequence.
    fn disable(&mut self);
    fn mode(&self) -> WatchdogMode;
}

#[cfg(target_arch = "avr")]
pub use self::avr::Wdt;

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::attiny13a::WDT;
    use avr_device::interrupt;

    pub struct Wdt {
        _private: (),
    }

    impl Wdt {
        #[inline]
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    impl Default for Wdt {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Write WDTCR behind the change-enable unlock.
    ///
    /// The second write must land within 4 clock cycles of the first, so both
    /// happen with interrupts masked and nothing in between.
    #[inline(always)]
    fn timed_write(value: u8) {
        interrupt::free(|_| unsafe {
            let p = WDT::ptr();
            (*p).wdtcr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcr.write(|w| w.bits(value));
        });
    }

    impl Watchdog for Wdt {
        #[inline]
        fn start_interrupt(&mut self, timeout: WatchdogTimeout) {
            timed_write(timeout.wdtcr_bits());
        }

        #[inline]
        fn arm_interrupt(&mut self) {
            unsafe {
                let p = WDT::ptr();
                // WDTIF is cleared by writing a one to it
                (*p).wdtcr.modify(|r, w| w.bits(r.bits() | WDTIF | WDTIE));
            }
        }

        #[inline]
        fn feed(&mut self) {
            avr_device::asm::wdr();
        }

        #[inline]
        fn disable(&mut self) {
            avr_device::asm::wdr();
            timed_write(0x00);
        }

        fn mode(&self) -> WatchdogMode {
            let bits = unsafe { (*WDT::ptr()).wdtcr.read().bits() };
            WatchdogMode::from_wdtcr(bits)
        }
    }
}
