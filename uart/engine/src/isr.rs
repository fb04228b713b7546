//! Interrupt handlers and the manual transmit poll

use log::trace;

use crate::{UartEngine, UartEvent, UartRegisters};

impl<R, const RX: usize, const TX: usize> UartEngine<R, RX, TX>
where
    R: UartRegisters,
{
    /// Receive-complete handler.
    ///
    /// Moves one byte from the data register into the receive ring. A byte
    /// with a parity error is read and thrown away. When the ring is full the
    /// incoming byte is dropped and the buffered ones are kept.
    pub fn on_rx_complete(&self) {
        if self.regs.has_parity_error() {
            let byte = self.regs.read_data();
            trace!("uart: parity error, discarded {:#04x}", byte);
            return;
        }

        let byte = self.regs.read_data();
        if !self.rx.try_push(byte) {
            trace!("uart: rx overflow, dropped {:#04x}", byte);
        }
    }

    /// Transmit-data-empty handler.
    ///
    /// Moves one byte from the transmit ring into the data register and
    /// clears transmit-complete so `flush` waits for that byte. Disables its
    /// own interrupt once the ring runs dry.
    pub fn on_tx_empty(&self) {
        if let Some(byte) = self.tx.try_pop() {
            self.regs.write_data(byte);
            self.regs.clear_tx_complete();
        }

        if self.tx.is_empty() {
            self.regs.set_interrupt(UartEvent::TxEmpty, false);
        }
    }

    /// Run the transmit handler by hand.
    ///
    /// Used by `write` and `flush` while they spin, so they still drain the
    /// ring when called with interrupts masked. The enable bit and the
    /// data-empty flag are re-checked with interrupts off; if the real
    /// handler got there first nothing happens.
    pub fn poll_tx(&self) {
        critical_section::with(|_| {
            if self.regs.is_interrupt_enabled(UartEvent::TxEmpty) && self.regs.is_tx_empty() {
                self.on_tx_empty();
            }
        });
    }
}
