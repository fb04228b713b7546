#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # UART Engine
//!
//! Buffered, interrupt-driven byte stream over one USART peripheral.
//!
//! Mainline code calls [`UartEngine::write`] and [`UartEngine::read`]; the
//! two interrupt vectors call [`UartEngine::on_rx_complete`] and
//! [`UartEngine::on_tx_empty`]. The only shared state is a pair of
//! single-producer / single-consumer rings plus the register block, and the
//! only locking is `critical-section` around the few multi-step register
//! sequences.

pub mod engine;
pub mod io;
pub mod isr;
pub mod regs;
pub mod vectors;

pub use engine::*;
pub use regs::*;
pub use vectors::*;

pub use uart_core::{self, FrameConfig, UartError, UartResult};

/// Engine with the default buffer sizes
pub type Serial<R> = UartEngine<R>;
