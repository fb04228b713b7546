#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # UART Registry
//!
//! Connects interrupt vectors to UART engines. Ports are bound by hardware
//! id in a [`PortRegistry`]; a vector either dispatches through the registry
//! at run time or is generated against a port static with [`uart_vectors!`].
//! [`serial_event_run`] gives the application loop its per-port
//! "input is waiting" callbacks.

pub mod hooks;
pub mod registry;
mod vectors;

pub use hooks::*;
pub use registry::*;

pub use uart_engine::PortVectors;
