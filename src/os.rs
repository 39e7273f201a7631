//! Sleep scheduling: the shared tick counter, power-down entry and the
//! watchdog wake handler.

use crate::config::WATCHDOG_TIMEOUT;
use crate::hal::{Adc, Module, Power, Watchdog, WatchdogMode};
use core::sync::atomic::{AtomicU8, Ordering};

/// Watchdog ticks left before the next light check.
///
/// Shared between the main loop and the watchdog interrupt. Only
/// [`TickCounter::decrement_if_positive`] runs in interrupt context, and the
/// main loop only reloads the counter once it has seen it at zero, when the
/// watchdog is stopped and no further tick can arrive. Single-byte loads and
/// stores are atomic on AVR, so no read-modify-write ever races.
pub struct TickCounter {
    remaining: AtomicU8,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU8::new(0),
        }
    }

    /// Interrupt context only.
    #[inline]
    pub fn decrement_if_positive(&self) {
        let remaining = self.remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining.store(remaining - 1, Ordering::SeqCst);
        }
    }

    #[inline]
    pub fn is_due(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn remaining(&self) -> u8 {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Main loop only, and only after [`is_due`](Self::is_due) returned true.
    #[inline]
    pub fn reload(&self, ticks: u8) {
        debug_assert!(self.is_due(), "tick counter reloaded before it ran out");
        debug_assert!(ticks > 0, "reload with zero ticks would never sleep");
        self.remaining.store(ticks, Ordering::SeqCst);
    }

    /// Boot only, before the watchdog is first armed.
    #[inline]
    pub fn clear(&self) {
        self.remaining.store(0, Ordering::SeqCst);
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Put the chip in power-down with the watchdog interrupt as the only way out.
///
/// Returns after the watchdog tick has fired and its handler has run.
pub fn go_to_sleep<P, W, A>(power: &mut P, watchdog: &mut W, adc: &mut A)
where
    P: Power,
    W: Watchdog,
    A: Adc,
{
    power.disable_brown_out();

    // Most blocks only need to be disabled before the clock stops
    adc.disable();
    power.disable_comparator();
    power.disable_digital_inputs();

    watchdog.start_interrupt(WATCHDOG_TIMEOUT);
    power.clear_reset_cause();
    watchdog.arm_interrupt();
    watchdog.feed();

    power.disable_module_clock(Module::Timer0);
    power.disable_module_clock(Module::Adc);
    debug_assert_eq!(
        watchdog.mode(),
        WatchdogMode::Interrupt,
        "watchdog would reset the chip instead of waking it"
    );
    power.enter_power_down();
}

/// Body of the `WDT` interrupt.
///
/// Stops the watchdog so it cannot fire again before the next sleep, then
/// counts one tick off.
#[inline(always)]
pub fn on_watchdog_tick<W: Watchdog>(watchdog: &mut W, ticks: &TickCounter) {
    watchdog.disable();
    ticks.decrement_if_positive();
}
