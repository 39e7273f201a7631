use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A GPIO line whose direction is switched at runtime.
///
/// The firefly LED is both the light source and the light sensor, so the same
/// pin flips between a driven output and a high-impedance analog input.
/// Switching to input also clears the PORT bit so no pull-up is left on.
pub trait SharedLine: OutputPin<Error = Infallible> {
    fn into_output(&mut self);
    fn into_input(&mut self);
    fn direction(&self) -> Direction;
}

/// Unwrap a pin result that cannot fail.
#[inline]
pub fn infallible(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}

#[cfg(target_arch = "avr")]
pub use self::avr::PortBPin;

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::attiny13a::PORTB;

    /// One PORTB bit
    pub struct PortBPin<const P: u8> {
        _private: (),
    }

    impl<const P: u8> PortBPin<P> {
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    impl<const P: u8> Default for PortBPin<P> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<const P: u8> OutputPin for PortBPin<P> {
        type Error = Infallible;

        #[inline]
        fn set_high(&mut self) -> Result<(), Infallible> {
            unsafe {
                (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() | (1 << P)));
            }
            Ok(())
        }

        #[inline]
        fn set_low(&mut self) -> Result<(), Infallible> {
            unsafe {
                (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
            }
            Ok(())
        }
    }

    impl<const P: u8> SharedLine for PortBPin<P> {
        #[inline]
        fn into_output(&mut self) {
            unsafe {
                (*PORTB::ptr()).ddrb.modify(|r, w| w.bits(r.bits() | (1 << P)));
            }
        }

        #[inline]
        fn into_input(&mut self) {
            unsafe {
                (*PORTB::ptr()).ddrb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
            }
        }

        fn direction(&self) -> Direction {
            let ddr = unsafe { (*PORTB::ptr()).ddrb.read().bits() };
            if ddr & (1 << P) != 0 {
                Direction::Output
            } else {
                Direction::Input
            }
        }
    }
}
