//! Host-side simulation of the ATtiny13A peripherals the firefly touches.
//!
//! Every simulated peripheral shares one [`SimChip`] and appends what it does
//! to an operation log, so tests can check both final register state and the
//! order things happened in. Sleeping runs the real watchdog handler, the
//! same way the `WDT` interrupt does on hardware.

use crate::application::Firefly;
use crate::diagnostics::ResetCause;
use crate::hal::adc::{Adc, AdcChannel, AdcPrescaler, AdcReference};
use crate::hal::gpio::{Direction, SharedLine};
use crate::hal::power::{Module, Power, SleepMode};
use crate::hal::watchdog::{Watchdog, WatchdogMode, WatchdogTimeout, WDE, WDTIE};
use crate::logger::{Event, Logger};
use crate::os::{self, TickCounter};
use core::cell::{RefCell, RefMut};
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use std::rc::Rc;

/// MCUSR after power-on and after a watchdog reset
const PORF: u8 = 1 << 0;
const WDRF: u8 = 1 << 3;

/// Result of the first conversion after enabling the ADC
pub const SPIKE: u16 = 1023;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ResetCauseTaken,
    ResetCauseCleared,
    InterruptsEnabled,
    BrownOutDisabled,
    ComparatorDisabled,
    DigitalInputsDisabled,
    ClockGated(Module),
    Slept,
    WatchdogStarted(WatchdogTimeout),
    WatchdogArmed,
    WatchdogFed,
    WatchdogDisabled,
    AdcPoweredUp,
    AdcEnabled,
    AdcDisabled,
    Conversion(u16),
    LineHigh,
    LineLow,
    LineOutput,
    LineInput,
    Delay(u16),
}

pub struct SimChip {
    pub ticks: &'static TickCounter,
    pub log: Vec<Op>,
    /// Watchdog mode right after each logged operation
    pub modes: Vec<WatchdogMode>,
    pub events: Vec<Event>,

    pub mcusr: u8,
    pub wdtcr: u8,
    pub interrupts_enabled: bool,
    pub sleep_mode: Option<SleepMode>,
    pub mode_at_last_sleep: Option<WatchdogMode>,
    pub wake_count: u32,

    pub brown_out_enabled: bool,
    pub comparator_enabled: bool,
    pub digital_inputs_enabled: bool,
    pub adc_clocked: bool,
    pub timer0_clocked: bool,

    pub adc_enabled: bool,
    pub adc_reference: AdcReference,
    pub adc_channel: AdcChannel,
    pub adc_prescaler: Option<AdcPrescaler>,
    /// `WouldBlock` polls before a conversion completes
    pub conversion_polls: u32,
    pub light_level: u16,
    converting: bool,
    polls_left: u32,
    first_since_enable: bool,
    last_result: u16,

    pub line_direction: Direction,
    pub line_high: bool,
}

impl SimChip {
    fn new(mcusr: u8, wdtcr: u8) -> Self {
        Self {
            ticks: Box::leak(Box::new(TickCounter::new())),
            log: Vec::new(),
            modes: Vec::new(),
            events: Vec::new(),
            mcusr,
            wdtcr,
            interrupts_enabled: false,
            sleep_mode: None,
            mode_at_last_sleep: None,
            wake_count: 0,
            brown_out_enabled: true,
            comparator_enabled: true,
            digital_inputs_enabled: true,
            adc_clocked: true,
            timer0_clocked: true,
            adc_enabled: false,
            adc_reference: AdcReference::Vcc,
            adc_channel: AdcChannel::Adc0,
            adc_prescaler: None,
            conversion_polls: 3,
            light_level: 512,
            converting: false,
            polls_left: 0,
            first_since_enable: false,
            last_result: 0,
            line_direction: Direction::Input,
            line_high: false,
        }
    }

    pub fn watchdog_mode(&self) -> WatchdogMode {
        WatchdogMode::from_wdtcr(self.wdtcr)
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.modes.clear();
    }

    pub fn count(&self, op: Op) -> usize {
        self.log.iter().filter(|&&logged| logged == op).count()
    }

    fn push(&mut self, op: Op) {
        self.log.push(op);
        let mode = self.watchdog_mode();
        self.modes.push(mode);
    }

    /// What the ADC pin sees right now
    fn sample(&self) -> u16 {
        match (self.line_direction, self.line_high) {
            (Direction::Input, _) => self.light_level,
            (Direction::Output, true) => 1023,
            (Direction::Output, false) => 0,
        }
    }
}

pub struct SimPower {
    chip: Rc<RefCell<SimChip>>,
}

impl Power for SimPower {
    fn take_reset_cause(&mut self) -> ResetCause {
        let mut chip = self.chip.borrow_mut();
        let flags = chip.mcusr;
        chip.mcusr = 0;
        chip.push(Op::ResetCauseTaken);
        ResetCause::from_bits(flags)
    }

    fn clear_reset_cause(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.mcusr = 0;
        chip.push(Op::ResetCauseCleared);
    }

    fn disable_brown_out(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.brown_out_enabled = false;
        chip.push(Op::BrownOutDisabled);
    }

    fn disable_comparator(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.comparator_enabled = false;
        chip.push(Op::ComparatorDisabled);
    }

    fn disable_digital_inputs(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.digital_inputs_enabled = false;
        chip.push(Op::DigitalInputsDisabled);
    }

    fn disable_module_clock(&mut self, module: Module) {
        let mut chip = self.chip.borrow_mut();
        match module {
            Module::Adc => chip.adc_clocked = false,
            Module::Timer0 => chip.timer0_clocked = false,
        }
        chip.push(Op::ClockGated(module));
    }

    fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.chip.borrow_mut().sleep_mode = Some(mode);
    }

    fn sleep(&mut self) {
        let ticks = {
            let mut chip = self.chip.borrow_mut();
            assert!(chip.interrupts_enabled, "sleeping with interrupts masked never wakes");
            let mode = chip.watchdog_mode();
            assert_eq!(
                mode,
                WatchdogMode::Interrupt,
                "sleeping without an interrupt-only watchdog"
            );
            chip.mode_at_last_sleep = Some(mode);
            chip.wake_count += 1;
            chip.push(Op::Slept);
            chip.ticks
        };

        // The watchdog period elapses and the WDT vector runs
        let mut watchdog = SimWatchdog {
            chip: Rc::clone(&self.chip),
        };
        os::on_watchdog_tick(&mut watchdog, ticks);
    }

    fn enable_interrupts(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.interrupts_enabled = true;
        chip.push(Op::InterruptsEnabled);
    }
}

pub struct SimWatchdog {
    chip: Rc<RefCell<SimChip>>,
}

impl Watchdog for SimWatchdog {
    fn start_interrupt(&mut self, timeout: WatchdogTimeout) {
        let mut chip = self.chip.borrow_mut();
        // WDRF set in MCUSR forces WDE on
        let forced = if chip.mcusr & WDRF != 0 { WDE } else { 0 };
        chip.wdtcr = timeout.wdtcr_bits() | forced;
        chip.push(Op::WatchdogStarted(timeout));
    }

    fn arm_interrupt(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.wdtcr |= WDTIE;
        chip.push(Op::WatchdogArmed);
    }

    fn feed(&mut self) {
        self.chip.borrow_mut().push(Op::WatchdogFed);
    }

    fn disable(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.wdtcr = if chip.mcusr & WDRF != 0 { WDE } else { 0 };
        chip.push(Op::WatchdogDisabled);
    }

    fn mode(&self) -> WatchdogMode {
        self.chip.borrow().watchdog_mode()
    }
}

pub struct SimAdc {
    chip: Rc<RefCell<SimChip>>,
}

impl Adc for SimAdc {
    fn power_up(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.adc_clocked = true;
        chip.push(Op::AdcPoweredUp);
    }

    fn set_reference(&mut self, reference: AdcReference) {
        self.chip.borrow_mut().adc_reference = reference;
    }

    fn select_channel(&mut self, channel: AdcChannel) {
        self.chip.borrow_mut().adc_channel = channel;
    }

    fn set_prescaler(&mut self, prescaler: AdcPrescaler) {
        let mut chip = self.chip.borrow_mut();
        chip.adc_prescaler = Some(prescaler);
        chip.adc_enabled = false;
    }

    fn enable(&mut self) {
        let mut chip = self.chip.borrow_mut();
        assert!(chip.adc_clocked, "ADC enabled while its clock is gated");
        chip.adc_enabled = true;
        chip.first_since_enable = true;
        chip.push(Op::AdcEnabled);
    }

    fn disable(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.adc_enabled = false;
        chip.converting = false;
        chip.push(Op::AdcDisabled);
    }

    fn start_conversion(&mut self) {
        let mut chip = self.chip.borrow_mut();
        assert!(
            chip.adc_enabled && chip.adc_clocked,
            "conversion started with the ADC off"
        );
        chip.converting = true;
        chip.polls_left = chip.conversion_polls;
    }

    fn poll_result(&mut self) -> nb::Result<u16, Infallible> {
        let mut chip = self.chip.borrow_mut();
        if !chip.converting {
            return Ok(chip.last_result);
        }
        if chip.polls_left > 0 {
            chip.polls_left -= 1;
            return Err(nb::Error::WouldBlock);
        }

        let value = if chip.first_since_enable {
            chip.first_since_enable = false;
            SPIKE
        } else {
            chip.sample()
        };
        chip.converting = false;
        chip.last_result = value;
        chip.push(Op::Conversion(value));
        Ok(value)
    }
}

pub struct SimLine {
    chip: Rc<RefCell<SimChip>>,
}

impl OutputPin for SimLine {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut chip = self.chip.borrow_mut();
        chip.line_high = true;
        chip.push(Op::LineHigh);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut chip = self.chip.borrow_mut();
        chip.line_high = false;
        chip.push(Op::LineLow);
        Ok(())
    }
}

impl SharedLine for SimLine {
    fn into_output(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.line_direction = Direction::Output;
        chip.push(Op::LineOutput);
    }

    fn into_input(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.line_direction = Direction::Input;
        chip.line_high = false;
        chip.push(Op::LineInput);
    }

    fn direction(&self) -> Direction {
        self.chip.borrow().line_direction
    }
}

pub struct SimDelay {
    chip: Rc<RefCell<SimChip>>,
}

impl DelayMs<u16> for SimDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.chip.borrow_mut().push(Op::Delay(ms));
    }
}

pub struct SimLogger {
    chip: Rc<RefCell<SimChip>>,
}

impl Logger for SimLogger {
    fn log(&mut self, event: Event) {
        self.chip.borrow_mut().events.push(event);
    }
}

pub type SimFirefly = Firefly<'static, SimPower, SimWatchdog, SimAdc, SimLine, SimDelay, SimLogger>;

pub struct SimBoard {
    pub chip: Rc<RefCell<SimChip>>,
    pub ticks: &'static TickCounter,
    pub power: SimPower,
    pub watchdog: SimWatchdog,
    pub adc: SimAdc,
    pub line: SimLine,
    pub delay: SimDelay,
    pub logger: SimLogger,
}

impl SimBoard {
    /// Fresh from power-on: watchdog stopped, PORF set.
    pub fn new() -> Self {
        Self::with_chip(SimChip::new(PORF, 0))
    }

    /// Fresh from a watchdog reset: WDRF set, which keeps WDE forced on.
    pub fn after_watchdog_reset() -> Self {
        let wdtcr = WDE | WatchdogTimeout::Ms16.wdtcr_bits();
        Self::with_chip(SimChip::new(WDRF, wdtcr))
    }

    fn with_chip(chip: SimChip) -> Self {
        let ticks = chip.ticks;
        let chip = Rc::new(RefCell::new(chip));
        Self {
            ticks,
            power: SimPower { chip: Rc::clone(&chip) },
            watchdog: SimWatchdog { chip: Rc::clone(&chip) },
            adc: SimAdc { chip: Rc::clone(&chip) },
            line: SimLine { chip: Rc::clone(&chip) },
            delay: SimDelay { chip: Rc::clone(&chip) },
            logger: SimLogger { chip: Rc::clone(&chip) },
            chip,
        }
    }

    pub fn chip(&self) -> RefMut<'_, SimChip> {
        self.chip.borrow_mut()
    }

    pub fn into_firefly(self) -> (SimFirefly, Rc<RefCell<SimChip>>) {
        let firefly = Firefly::new(
            self.power,
            self.watchdog,
            self.adc,
            self.line,
            self.delay,
            self.logger,
            self.ticks,
        );
        (firefly, self.chip)
    }
}
