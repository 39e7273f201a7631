#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
use firefly_firmware::{
    application::Firefly,
    config::LED_PIN,
    hal::{AdcUnit, Cpu, CycleDelay, PortBPin, Wdt},
    logger::NullLogger,
    os::{self, TickCounter},
};

// Shared with the watchdog interrupt
#[cfg(target_arch = "avr")]
static TICKS: TickCounter = TickCounter::new();

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let firefly = Firefly::new(
        Cpu::new(),
        Wdt::new(),
        AdcUnit::new(),
        PortBPin::<{ LED_PIN }>::new(),
        CycleDelay::new(),
        NullLogger,
        &TICKS,
    );

    firefly.run()
}

#[cfg(target_arch = "avr")]
#[allow(non_snake_case)]
#[avr_device::interrupt(attiny13a)]
fn WDT() {
    os::on_watchdog_tick(&mut Wdt::new(), &TICKS);
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("firefly runs on an ATtiny13A; build with an AVR target, or run `cargo test` for the host simulation");
}
