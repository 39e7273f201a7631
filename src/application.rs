//! Application layer: the firefly's sense/blink state machine
//!
//! The device spends its life in power-down. Every watchdog tick wakes it
//! briefly; once enough ticks have passed it checks the light on the LED and,
//! if it is dark, blinks twice before going back to sleep.

use crate::config::{
    BLINKING_INTERVAL, BLINK_PAUSE_MS, DISCHARGE_MS, SEARCHING_INTERVAL,
};
use crate::diagnostics::Error;
use crate::drivers::{blink, read_light_level, LightLevel};
use crate::hal::gpio::infallible;
use crate::hal::{Adc, Power, SharedLine, Watchdog};
use crate::logger::{Event, Logger};
use crate::os::{self, TickCounter};
use embedded_hal::blocking::delay::DelayMs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Powered down until the next watchdog tick.
    Sleeping,
    /// Just woke; sense only if the tick counter has run out.
    CheckDue,
    Sensing,
    Deciding(LightLevel),
    Blinking,
    /// Reload the tick counter with this many ticks.
    Rescheduling(u8),
}

/// What to do with a light reading.
pub const fn decide(level: LightLevel) -> Phase {
    if level.is_dark() {
        Phase::Blinking
    } else {
        Phase::Rescheduling(SEARCHING_INTERVAL)
    }
}

pub struct Firefly<'t, P, W, A, L, D, G> {
    power: P,
    watchdog: W,
    adc: A,
    line: L,
    delay: D,
    logger: G,
    ticks: &'t TickCounter,
}

impl<'t, P, W, A, L, D, G> Firefly<'t, P, W, A, L, D, G>
where
    P: Power,
    W: Watchdog,
    A: Adc,
    L: SharedLine,
    D: DelayMs<u16>,
    G: Logger,
{
    pub fn new(
        power: P,
        watchdog: W,
        adc: A,
        line: L,
        delay: D,
        logger: G,
        ticks: &'t TickCounter,
    ) -> Self {
        Self {
            power,
            watchdog,
            adc,
            line,
            delay,
            logger,
            ticks,
        }
    }

    /// Start-up: record why we reset, LED off, watchdog off, interrupts on.
    pub fn boot(&mut self) {
        // MCUSR first: a pending WDRF keeps the watchdog from being disabled
        let cause = self.power.take_reset_cause();

        infallible(self.line.set_low());
        self.line.into_output();

        self.ticks.clear();
        self.watchdog.disable();
        self.power.enable_interrupts();

        self.logger.log(Event::Boot(cause));
    }

    /// Perform `phase` and return the phase that follows it.
    pub fn step(&mut self, phase: Phase) -> Phase {
        match phase {
            Phase::Sleeping => {
                os::go_to_sleep(&mut self.power, &mut self.watchdog, &mut self.adc);
                self.logger.log(Event::Woke {
                    remaining: self.ticks.remaining(),
                });
                Phase::CheckDue
            }
            Phase::CheckDue => {
                if self.ticks.is_due() {
                    Phase::Sensing
                } else {
                    Phase::Sleeping
                }
            }
            Phase::Sensing => match self.sense() {
                Ok(level) => {
                    self.logger.log(Event::Sensed(level.raw()));
                    Phase::Deciding(level)
                }
                Err(err) => {
                    self.logger.log(Event::Fault(err));
                    Phase::Rescheduling(SEARCHING_INTERVAL)
                }
            },
            Phase::Deciding(level) => decide(level),
            Phase::Blinking => {
                self.double_blink();
                Phase::Rescheduling(BLINKING_INTERVAL)
            }
            Phase::Rescheduling(ticks) => {
                self.ticks.reload(ticks);
                self.logger.log(Event::Rescheduled(ticks));
                Phase::Sleeping
            }
        }
    }

    /// One sleep and everything it leads to, until the next sleep is due.
    pub fn cycle(&mut self) {
        let mut phase = self.step(Phase::Sleeping);
        while phase != Phase::Sleeping {
            phase = self.step(phase);
        }
    }

    pub fn run(mut self) -> ! {
        self.boot();
        loop {
            self.cycle();
        }
    }

    fn sense(&mut self) -> Result<LightLevel, Error> {
        // Drain whatever charge the LED is holding before reading it
        infallible(self.line.set_low());
        self.line.into_output();
        self.delay.delay_ms(DISCHARGE_MS);
        self.line.into_input();

        read_light_level(&mut self.adc, &mut self.delay)
    }

    fn double_blink(&mut self) {
        blink(&mut self.line, &mut self.watchdog, &mut self.delay);
        self.logger.log(Event::Blink);
        self.delay.delay_ms(BLINK_PAUSE_MS);
        blink(&mut self.line, &mut self.watchdog, &mut self.delay);
        self.logger.log(Event::Blink);
    }
}
