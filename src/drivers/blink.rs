use crate::config::BLINK_HOLD_MS;
use crate::hal::gpio::infallible;
use crate::hal::{Direction, SharedLine, Watchdog};
use embedded_hal::blocking::delay::DelayMs;

/// Light the LED for [`BLINK_HOLD_MS`], then leave its pin as a
/// high-impedance input ready for the next light reading.
pub fn blink<L, W, D>(line: &mut L, watchdog: &mut W, delay: &mut D)
where
    L: SharedLine,
    W: Watchdog,
    D: DelayMs<u16>,
{
    // Set the level first so the pin never drives low on the way to output
    infallible(line.set_high());
    line.into_output();
    delay.delay_ms(BLINK_HOLD_MS);
    // Stopped at this point, but a stray enable must not reset mid-blink
    watchdog.feed();
    infallible(line.set_low());
    line.into_input();
    debug_assert_eq!(line.direction(), Direction::Input);
}
