//! Type-erased interrupt entry points

use crate::{UartEngine, UartRegisters};

/// What an interrupt vector or event dispatcher needs from a port.
///
/// Lets engines with different register types and buffer sizes sit in one
/// table.
pub trait PortVectors: Sync {
    /// Run the receive-complete handler
    fn on_rx_complete(&self);

    /// Run the transmit-data-empty handler
    fn on_tx_empty(&self);

    /// Whether unread input is waiting
    fn has_data(&self) -> bool;
}

impl<R, const RX: usize, const TX: usize> PortVectors for UartEngine<R, RX, TX>
where
    R: UartRegisters + Sync,
{
    fn on_rx_complete(&self) {
        UartEngine::on_rx_complete(self)
    }

    fn on_tx_empty(&self) {
        UartEngine::on_tx_empty(self)
    }

    fn has_data(&self) -> bool {
        UartEngine::has_data(self)
    }
}
