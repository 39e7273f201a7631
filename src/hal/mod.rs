pub mod adc;
pub mod gpio;
pub mod power;
pub mod timer;
pub mod watchdog;

// Re-export commonly used types
pub use adc::{Adc, AdcChannel, AdcPrescaler, AdcReference};
pub use gpio::{Direction, SharedLine};
pub use power::{Module, Power, SleepMode};
pub use watchdog::{Watchdog, WatchdogMode, WatchdogTimeout};

#[cfg(target_arch = "avr")]
pub use adc::AdcUnit;
#[cfg(target_arch = "avr")]
pub use gpio::PortBPin;
#[cfg(target_arch = "avr")]
pub use power::Cpu;
#[cfg(target_arch = "avr")]
pub use timer::CycleDelay;
#[cfg(target_arch = "avr")]
pub use watchdog::Wdt;
