//! Millisecond delays.
//!
//! Timer0 stays clock-gated after the first sleep, so delays are counted in
//! CPU cycles instead of timer ticks.

use crate::config::CPU_FREQ_HZ;

/// Approximate cost of one iteration of the inner delay loop
pub const CYCLES_PER_ITERATION: u32 = 6;

/// Inner loop iterations needed for one millisecond
pub const ITERATIONS_PER_MS: u16 = (CPU_FREQ_HZ / 1000 / CYCLES_PER_ITERATION) as u16;

#[cfg(target_arch = "avr")]
pub use self::avr::CycleDelay;

#[cfg(target_arch = "avr")]
mod avr {
    use super::ITERATIONS_PER_MS;
    use embedded_hal::blocking::delay::DelayMs;

    pub struct CycleDelay {
        _private: (),
    }

    impl CycleDelay {
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    impl Default for CycleDelay {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DelayMs<u16> for CycleDelay {
        fn delay_ms(&mut self, ms: u16) {
            for _ in 0..ms {
                for _ in 0..ITERATIONS_PER_MS {
                    avr_device::asm::nop();
                }
            }
        }
    }
}
