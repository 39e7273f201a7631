//! Firefly: a low-power ATtiny13A firmware that uses its LED as a dark sensor.
//!
//! The chip sleeps in power-down, woken every half second by the watchdog
//! interrupt. Every so many ticks it turns the LED pin into an ADC input,
//! measures how much light the LED is picking up and, when it is dark enough,
//! blinks the same LED twice.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod hal;
pub mod logger;
pub mod os;

#[cfg(test)]
pub(crate) mod testing;
