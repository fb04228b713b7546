//! Baud divisor calculation

use crate::{UartError, UartResult};

/// Smallest divisor the baud register accepts in normal-speed mode
pub const MIN_DIVISOR: u16 = 64;

/// Compute the value for the 16-bit baud register.
///
/// The nominal divisor is `8 * clock_hz / baud / 2`, rounded half up, then
/// corrected by the oscillator calibration `trim` in units of 1/1024.
pub fn baud_divisor(clock_hz: u32, baud: u32, trim: i8) -> UartResult<u16> {
    if baud == 0 {
        return Err(UartError::InvalidBaudRate);
    }

    let nominal = ((8 * u64::from(clock_hz)) / u64::from(baud) + 1) / 2;
    let nominal = i64::try_from(nominal).map_err(|_| UartError::DivisorOutOfRange)?;
    let divisor = nominal + nominal * i64::from(trim) / 1024;

    u16::try_from(divisor)
        .ok()
        .filter(|&d| d >= MIN_DIVISOR)
        .ok_or(UartError::DivisorOutOfRange)
}
