//! Simulated USART for host builds
//!
//! [`SimUart`] models the register block of one USART closely enough for the
//! engine's fast path, data-empty interrupt and transmit-complete handling to
//! behave as on silicon: a transmit data register feeding a shift register,
//! a data-empty flag, and a transmit-complete flag that starts clear.
//! [`SimHarness`] advances the transmitter one byte at a time and raises the
//! interrupt handlers when their enable bits and flags say the hardware would.

mod harness;
mod uart;

pub use harness::SimHarness;
pub use uart::SimUart;

/// Clock used by the simulated parts
pub const SIM_CLOCK_HZ: u32 = 16_000_000;
