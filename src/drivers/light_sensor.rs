//! Reads ambient light through the LED.
//!
//! A reverse-biased LED behaves like a weak photodiode. With the pin
//! high-impedance and a 1M resistor across the LED, the voltage it builds up
//! rises with the light falling on it and is read on the internal 1.1V
//! reference, so the result does not drift as the battery sags.

use crate::config::{CONVERSION_POLL_LIMIT, DARK_THRESHOLD, LED_CHANNEL, SETTLE_MS};
use crate::diagnostics::Error;
use crate::hal::{Adc, AdcPrescaler, AdcReference};
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;

/// Raw 10-bit conversion of the LED voltage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightLevel(pub u16);

impl LightLevel {
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_dark(self) -> bool {
        self.0 < DARK_THRESHOLD
    }
}

/// Poll `poll` until it stops returning `WouldBlock`, at most `limit` times.
pub fn poll_bounded<T, F>(limit: u16, mut poll: F) -> Result<T, Error>
where
    F: FnMut() -> nb::Result<T, Infallible>,
{
    for _ in 0..limit {
        match poll() {
            Ok(value) => return Ok(value),
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(never)) => match never {},
        }
    }
    Err(Error::ConversionTimeout)
}

fn convert<A: Adc>(adc: &mut A) -> Result<u16, Error> {
    adc.start_conversion();
    poll_bounded(CONVERSION_POLL_LIMIT, || adc.poll_result())
}

/// Measure the light level on the LED.
///
/// The caller must already have discharged the LED and switched its pin to
/// input. The ADC is left powered; the next sleep turns it off.
pub fn read_light_level<A, D>(adc: &mut A, delay: &mut D) -> Result<LightLevel, Error>
where
    A: Adc,
    D: DelayMs<u16>,
{
    adc.power_up();
    adc.set_reference(AdcReference::Internal1V1);
    adc.select_channel(LED_CHANNEL);
    adc.set_prescaler(AdcPrescaler::Div64);
    adc.enable();

    // Throwaway: enabling the ADC puts a spike on the LED
    convert(adc)?;

    // The 1M resistor bleeds the rest of it off
    delay.delay_ms(SETTLE_MS);

    convert(adc).map(LightLevel)
}
