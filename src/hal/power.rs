use crate::diagnostics::ResetCause;

/// BODCR bits
pub const BPDS: u8 = 1 << 1;
pub const BPDSE: u8 = 1 << 0;

/// ACSR analog comparator disable
pub const ACD: u8 = 1 << 7;

/// DIDR0: AIN0D, AIN1D and ADC0D..ADC3D
pub const DIDR0_ALL: u8 = 0x3F;

/// MCUCR sleep enable and sleep mode field
pub const SE: u8 = 1 << 5;
pub const SM_MASK: u8 = 0x18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SleepMode {
    Idle = 0,
    AdcNoiseReduction = 1,
    PowerDown = 2,
}

impl SleepMode {
    #[inline]
    pub const fn mcucr_bits(self) -> u8 {
        (self as u8) << 3
    }
}

/// Peripherals with a clock gate in PRR, by bit position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Module {
    Adc = 0,
    Timer0 = 1,
}

impl Module {
    #[inline]
    pub const fn prr_bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Core power control: sleep, clock gating and the always-on analog blocks.
pub trait Power {
    /// Read MCUSR and clear it.
    fn take_reset_cause(&mut self) -> ResetCause;
    fn clear_reset_cause(&mut self);
    /// Turn the brown-out detector off through its timed BODCR sequence.
    fn disable_brown_out(&mut self);
    fn disable_comparator(&mut self);
    /// Disconnect the digital input buffers from every analog-capable pin.
    fn disable_digital_inputs(&mut self);
    fn disable_module_clock(&mut self, module: Module);
    fn set_sleep_mode(&mut self, mode: SleepMode);
    /// Set SE, execute `sleep`, clear SE once an interrupt has woken the core.
    fn sleep(&mut self);
    fn enable_interrupts(&mut self);

    fn enter_power_down(&mut self) {
        self.set_sleep_mode(SleepMode::PowerDown);
        self.sleep();
    }
}

#[cfg(target_arch = "avr")]
pub use self::avr::Cpu;

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::attiny13a::{AC, ADC, CPU};
    use avr_device::interrupt;

    pub struct Cpu {
        _private: (),
    }

    impl Cpu {
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    impl Default for Cpu {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Power for Cpu {
        fn take_reset_cause(&mut self) -> ResetCause {
            unsafe {
                let p = CPU::ptr();
                let flags = (*p).mcusr.read().bits();
                (*p).mcusr.write(|w| w.bits(0));
                ResetCause::from_bits(flags)
            }
        }

        #[inline]
        fn clear_reset_cause(&mut self) {
            unsafe { (*CPU::ptr()).mcusr.write(|w| w.bits(0)) }
        }

        /// BPDSE must be cleared within 4 clock cycles of setting both bits.
        #[inline(always)]
        fn disable_brown_out(&mut self) {
            interrupt::free(|_| unsafe {
                let p = CPU::ptr();
                (*p).bodcr.write(|w| w.bits(BPDS | BPDSE));
                (*p).bodcr.write(|w| w.bits(BPDS));
            });
        }

        #[inline]
        fn disable_comparator(&mut self) {
            unsafe {
                (*AC::ptr()).acsr.modify(|r, w| w.bits(r.bits() | ACD));
            }
        }

        #[inline]
        fn disable_digital_inputs(&mut self) {
            unsafe {
                (*ADC::ptr()).didr0.write(|w| w.bits(DIDR0_ALL));
            }
        }

        #[inline]
        fn disable_module_clock(&mut self, module: Module) {
            unsafe {
                let p = CPU::ptr();
                (*p).prr.modify(|r, w| w.bits(r.bits() | module.prr_bit()));
            }
        }

        #[inline]
        fn set_sleep_mode(&mut self, mode: SleepMode) {
            unsafe {
                let p = CPU::ptr();
                (*p).mcucr.modify(|r, w| {
                    w.bits((r.bits() & !SM_MASK) | mode.mcucr_bits())
                });
            }
        }

        #[inline]
        fn sleep(&mut self) {
            unsafe {
                let p = CPU::ptr();
                (*p).mcucr.modify(|r, w| w.bits(r.bits() | SE));
                avr_device::asm::sleep();
                (*p).mcucr.modify(|r, w| w.bits(r.bits() & !SE));
            }
        }

        #[inline]
        fn enable_interrupts(&mut self) {
            // SAFETY: called from the main loop, never inside `interrupt::free`
            unsafe { interrupt::enable() };
        }
    }
}
