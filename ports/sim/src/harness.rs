//! Interrupt simulation around a [`SimUart`]

use uart_engine::PortVectors;

use crate::SimUart;

/// Steps a simulated USART and raises the port's interrupt handlers.
///
/// Handlers run inside a critical section, as they would with the CPU's
/// global interrupt flag cleared on vector entry.
pub struct SimHarness<'a, P: PortVectors + ?Sized> {
    sim: &'a SimUart,
    port: &'a P,
}

impl<'a, P: PortVectors + ?Sized> SimHarness<'a, P> {
    /// Attach the harness to a port and the USART it drives
    pub fn new(sim: &'a SimUart, port: &'a P) -> Self {
        Self { sim, port }
    }

    /// The simulated USART
    pub fn sim(&self) -> &'a SimUart {
        self.sim
    }

    /// Finish one byte on the line, then raise the data-empty interrupt if
    /// it is enabled and pending. Returns the byte that left the line.
    pub fn tick(&self) -> Option<u8> {
        let sent = self.sim.tick();
        self.service_tx();
        sent
    }

    /// Raise the data-empty interrupt if it is enabled and pending
    pub fn service_tx(&self) -> bool {
        critical_section::with(|_| {
            if self.sim.tx_interrupt_pending() {
                self.port.on_tx_empty();
                true
            } else {
                false
            }
        })
    }

    /// Deliver a byte on the RX line
    pub fn inject_rx(&self, byte: u8) -> bool {
        self.inject(byte, false)
    }

    /// Deliver a byte carrying a parity error
    pub fn inject_rx_error(&self, byte: u8) -> bool {
        self.inject(byte, true)
    }

    fn inject(&self, byte: u8, parity_error: bool) -> bool {
        if !self.sim.receive(byte, parity_error) {
            return false;
        }
        critical_section::with(|_| {
            if self.sim.rx_interrupt_pending() {
                self.port.on_rx_complete();
            }
        });
        true
    }

    /// Tick until the line is idle and no transmit interrupt is pending.
    ///
    /// Gives up after `limit` ticks. Returns the number of bytes sent.
    pub fn run_until_idle(&self, limit: usize) -> usize {
        let mut sent = 0;
        for _ in 0..limit {
            self.service_tx();
            if self.sim.is_line_idle() && !self.sim.tx_interrupt_pending() {
                break;
            }
            if self.tick().is_some() {
                sent += 1;
            }
        }
        sent
    }
}
