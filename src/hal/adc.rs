use core::convert::Infallible;

/// ADCSRA bits
pub const ADEN: u8 = 1 << 7;
pub const ADSC: u8 = 1 << 6;
pub const ADIF: u8 = 1 << 4;

/// ADMUX REFS0 selects the internal 1.1V reference
pub const REFS0: u8 = 1 << 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcChannel {
    Adc0 = 0, // PB5
    Adc1 = 1, // PB2
    Adc2 = 2, // PB4
    Adc3 = 3, // PB3
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcReference {
    Vcc = 0,
    Internal1V1 = 1,
}

impl AdcReference {
    #[inline]
    pub const fn admux_bits(self) -> u8 {
        match self {
            AdcReference::Vcc => 0,
            AdcReference::Internal1V1 => REFS0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcPrescaler {
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

/// Single-ended 10-bit converter.
pub trait Adc {
    /// Ungate the ADC clock in PRR.
    fn power_up(&mut self);
    fn set_reference(&mut self, reference: AdcReference);
    fn select_channel(&mut self, channel: AdcChannel);
    /// Write ADCSRA with only the prescaler set (ADC left disabled) and
    /// clear ADCSRB so no auto-trigger source is selected.
    fn set_prescaler(&mut self, prescaler: AdcPrescaler);
    /// Set ADEN and clear a stale ADIF in the same write.
    fn enable(&mut self);
    fn disable(&mut self);
    fn start_conversion(&mut self);
    /// `WouldBlock` while ADSC is still set, otherwise the 10-bit result.
    fn poll_result(&mut self) -> nb::Result<u16, Infallible>;
}

#[cfg(target_arch = "avr")]
pub use self::avr::AdcUnit;

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use crate::hal::power::Module;
    use avr_device::attiny13a::{ADC, CPU};

    pub struct AdcUnit {
        _private: (),
    }

    impl AdcUnit {
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    impl Default for AdcUnit {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Adc for AdcUnit {
        fn power_up(&mut self) {
            unsafe {
                let p = CPU::ptr();
                (*p).prr.modify(|r, w| w.bits(r.bits() & !Module::Adc.prr_bit()));
            }
        }

        fn set_reference(&mut self, reference: AdcReference) {
            unsafe {
                let p = ADC::ptr();
                (*p).admux.modify(|r, w| {
                    w.bits((r.bits() & !REFS0) | reference.admux_bits())
                });
            }
        }

        fn select_channel(&mut self, channel: AdcChannel) {
            unsafe {
                let p = ADC::ptr();
                (*p).admux.modify(|r, w| w.bits((r.bits() & 0xFC) | channel as u8));
            }
        }

        fn set_prescaler(&mut self, prescaler: AdcPrescaler) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsrb.write(|w| w.bits(0));
                (*p).adcsra.write(|w| w.bits(prescaler as u8));
            }
        }

        fn enable(&mut self) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsra.modify(|r, w| w.bits(r.bits() | ADEN | ADIF));
            }
        }

        fn disable(&mut self) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsra.modify(|r, w| w.bits(r.bits() & !ADEN));
            }
        }

        fn start_conversion(&mut self) {
            unsafe {
                let p = ADC::ptr();
                (*p).adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
            }
        }

        fn poll_result(&mut self) -> nb::Result<u16, Infallible> {
            unsafe {
                let p = ADC::ptr();
                if (*p).adcsra.read().bits() & ADSC != 0 {
                    return Err(nb::Error::WouldBlock);
                }
                // 16-bit access reads ADCL before ADCH
                Ok((*p).adc.read().bits())
            }
        }
    }
}
