#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # UART Core
//!
//! Core types shared by the buffered UART transport: the single-producer /
//! single-consumer byte ring used between mainline code and interrupt
//! handlers, the frame-format word, and the baud divisor calculation.

use core::fmt;

pub mod baud;
pub mod config;
pub mod frame;
pub mod ring;

pub use baud::*;
pub use config::*;
pub use frame::*;
pub use ring::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used by configuration and binding operations
pub type UartResult<T> = Result<T, UartError>;

/// Error types for UART configuration and port binding.
///
/// The byte-stream data path never returns these: an empty read is `None`,
/// receive overflow drops the byte and a full transmit buffer blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    /// Baud rate of zero
    InvalidBaudRate,
    /// Computed divisor does not fit the baud register
    DivisorOutOfRange,
    /// Port id outside the registry
    InvalidPort,
    /// A port is already bound to this id
    PortInUse,
    /// No port is bound to this id
    PortNotBound,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::InvalidBaudRate => write!(f, "Invalid baud rate"),
            UartError::DivisorOutOfRange => write!(f, "Baud divisor out of range"),
            UartError::InvalidPort => write!(f, "Invalid port id"),
            UartError::PortInUse => write!(f, "Port id already bound"),
            UartError::PortNotBound => write!(f, "No port bound to id"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UartError {}

#[cfg(feature = "defmt")]
impl defmt::Format for UartError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            UartError::InvalidBaudRate => defmt::write!(fmt, "InvalidBaudRate"),
            UartError::DivisorOutOfRange => defmt::write!(fmt, "DivisorOutOfRange"),
            UartError::InvalidPort => defmt::write!(fmt, "InvalidPort"),
            UartError::PortInUse => defmt::write!(fmt, "PortInUse"),
            UartError::PortNotBound => defmt::write!(fmt, "PortNotBound"),
        }
    }
}
