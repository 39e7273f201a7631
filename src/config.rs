//! Configuration constants for the firefly firmware
//!
//! Every threshold and timing below was tuned empirically on the reference
//! board and is fixed at compile time.

use crate::hal::{AdcChannel, WatchdogTimeout};

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 1_200_000;

/// Watchdog period; one period is one tick
pub const WATCHDOG_TIMEOUT: WatchdogTimeout = WatchdogTimeout::Ms500;

/// Ticks to sleep between checks while it is light out
pub const SEARCHING_INTERVAL: u8 = 128;

/// Ticks to sleep between double-blinks while it is dark
pub const BLINKING_INTERVAL: u8 = 24;

/// Raw readings below this count as dark (10-bit, 1.1V internal reference)
pub const DARK_THRESHOLD: u16 = 3;

/// How long the LED is driven low before sensing, in milliseconds
pub const DISCHARGE_MS: u16 = 10;

/// Delay between the throwaway and the measured conversion, in milliseconds
pub const SETTLE_MS: u16 = 10;

/// How long one blink keeps the LED lit, in milliseconds
pub const BLINK_HOLD_MS: u16 = 750;

/// Pause between the two blinks of a double-blink, in milliseconds
pub const BLINK_PAUSE_MS: u16 = 800;

/// Upper bound on busy polls of a single ADC conversion.
///
/// A conversion at ADC clock / 64 takes 13 ADC cycles (25 for the first one
/// after enabling), well under a thousand CPU cycles.
pub const CONVERSION_POLL_LIMIT: u16 = 10_000;

/// PORTB bit the LED is wired to
pub const LED_PIN: u8 = 4;

/// ADC input that shares the LED pin (PB4 = ADC2)
pub const LED_CHANNEL: AdcChannel = AdcChannel::Adc2;
