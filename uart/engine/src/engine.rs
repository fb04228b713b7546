//! Buffered UART engine: lifecycle and byte-stream API

use core::cell::Cell;
use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use log::debug;
use uart_core::{
    baud_divisor, FrameConfig, RingBuffer, UartResult, DEFAULT_RX_BUFFER_SIZE,
    DEFAULT_TX_BUFFER_SIZE,
};

use crate::{UartEvent, UartRegisters};

/// Port lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// Receiver, transmitter and interrupts are off
    Disabled,
    /// Port configured and running
    Enabled,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PortState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PortState::Disabled => defmt::write!(fmt, "Disabled"),
            PortState::Enabled => defmt::write!(fmt, "Enabled"),
        }
    }
}

/// One physical UART port.
///
/// The receive ring is filled by [`on_rx_complete`](Self::on_rx_complete)
/// and drained by [`read`](Self::read); the transmit ring is filled by
/// [`write`](Self::write) and drained by [`on_tx_empty`](Self::on_tx_empty).
/// Every operation takes `&self` so the engine can be a `static` shared by
/// mainline code and the interrupt vectors.
pub struct UartEngine<
    R,
    const RX: usize = DEFAULT_RX_BUFFER_SIZE,
    const TX: usize = DEFAULT_TX_BUFFER_SIZE,
> {
    pub(crate) regs: R,
    clock_hz: u32,
    pub(crate) rx: RingBuffer<RX>,
    pub(crate) tx: RingBuffer<TX>,
    /// Set once a byte has been handed to the transmitter since `begin`
    written: AtomicBool,
    state: Mutex<Cell<PortState>>,
}

impl<R, const RX: usize, const TX: usize> UartEngine<R, RX, TX>
where
    R: UartRegisters,
{
    /// Create a disabled engine for the register block `regs`
    pub const fn new(regs: R, clock_hz: u32) -> Self {
        Self {
            regs,
            clock_hz,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            written: AtomicBool::new(false),
            state: Mutex::new(Cell::new(PortState::Disabled)),
        }
    }

    /// Access the underlying register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// CPU clock the divisor is computed from
    pub const fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    /// Current lifecycle state
    pub fn state(&self) -> PortState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Check if the port is enabled
    pub fn is_enabled(&self) -> bool {
        self.state() == PortState::Enabled
    }

    /// Configure the hardware and enable the port.
    ///
    /// A port that has transmitted since its last `begin` is shut down with
    /// [`end`](Self::end) first so live hardware is never reprogrammed. An
    /// invalid baud rate is rejected before any register is touched.
    pub fn begin(&self, baud: u32, frame: FrameConfig) -> UartResult<()> {
        let divisor = baud_divisor(self.clock_hz, baud, self.regs.calibration_trim())?;

        if self.written.load(Ordering::Acquire) {
            self.end();
            self.written.store(false, Ordering::Release);
        }

        critical_section::with(|cs| {
            self.regs.route_pins();
            self.regs.set_double_speed(false);
            self.regs.set_baud_divisor(divisor);
            self.regs.set_frame_format(frame);

            self.rx.reset();
            self.tx.reset();
            self.regs.set_interrupt(UartEvent::TxEmpty, false);

            self.regs.set_receiver(true);
            self.regs.set_transmitter(true);
            self.regs.set_interrupt(UartEvent::RxComplete, true);
            self.regs.drive_tx_pin();

            self.state.borrow(cs).set(PortState::Enabled);
        });

        debug!(
            "uart: begin baud={} divisor={} frame={:#04x}",
            baud,
            divisor,
            frame.bits()
        );
        Ok(())
    }

    /// Drain pending output, then disable the port and drop unread input.
    ///
    /// Pin electrical state is left as it is.
    pub fn end(&self) {
        self.flush();

        critical_section::with(|cs| {
            self.regs.set_receiver(false);
            self.regs.set_transmitter(false);
            self.regs.set_interrupt(UartEvent::RxComplete, false);
            self.regs.set_interrupt(UartEvent::TxEmpty, false);

            self.rx.discard();
            self.written.store(false, Ordering::Release);
            self.state.borrow(cs).set(PortState::Disabled);
        });

        debug!("uart: end");
    }

    /// Number of received bytes waiting to be read
    pub fn available(&self) -> usize {
        self.rx.len()
    }

    /// Availability predicate polled by the serial-event dispatcher
    pub fn has_data(&self) -> bool {
        self.available() > 0
    }

    /// Next received byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.rx.guarded(|rx| rx.peek())
    }

    /// Consume the next received byte; `None` when nothing is waiting
    pub fn read(&self) -> Option<u8> {
        self.rx.guarded(|rx| rx.try_pop())
    }

    /// Non-blocking read
    pub fn try_read(&self) -> nb::Result<u8, Infallible> {
        self.read().ok_or(nb::Error::WouldBlock)
    }

    /// Copy whatever is already received into `buf`, without waiting
    pub fn read_available(&self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.read() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Free slots in the transmit ring
    pub fn available_for_write(&self) -> usize {
        self.tx.free_space()
    }

    /// One transmit attempt without waiting.
    ///
    /// With nothing queued and the data register empty the byte goes
    /// straight to the hardware; otherwise it is queued for the data-empty
    /// interrupt. `WouldBlock` means the transmit ring is full.
    pub fn try_write(&self, byte: u8) -> nb::Result<(), Infallible> {
        critical_section::with(|_| {
            if !self.regs.is_interrupt_enabled(UartEvent::TxEmpty) && self.regs.is_tx_empty() {
                self.regs.write_data(byte);
                self.regs.clear_tx_complete();
                self.written.store(true, Ordering::Release);
                return Ok(());
            }

            if self.tx.try_push(byte) {
                self.written.store(true, Ordering::Release);
                self.regs.set_interrupt(UartEvent::TxEmpty, true);
                return Ok(());
            }

            Err(nb::Error::WouldBlock)
        })
    }

    /// Transmit one byte, spinning while the transmit ring is full.
    ///
    /// Always returns 1. While spinning the data-empty handler is run by
    /// hand through [`poll_tx`](Self::poll_tx), so this also makes progress
    /// with interrupts masked.
    pub fn write(&self, byte: u8) -> usize {
        loop {
            match self.try_write(byte) {
                Ok(()) => return 1,
                Err(nb::Error::WouldBlock) => {
                    self.poll_tx();
                    core::hint::spin_loop();
                }
                Err(nb::Error::Other(never)) => match never {},
            }
        }
    }

    /// Transmit every byte of `bytes`
    pub fn write_bytes(&self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&byte| self.write(byte)).sum()
    }

    /// Wait until the transmit ring is empty and the last byte left the wire.
    ///
    /// Returns at once if nothing was written since `begin`: the
    /// transmit-complete flag has no defined state before first use.
    pub fn flush(&self) {
        if !self.written.load(Ordering::Acquire) {
            return;
        }

        while self.regs.is_interrupt_enabled(UartEvent::TxEmpty) || !self.regs.is_tx_complete() {
            self.poll_tx();
            core::hint::spin_loop();
        }
    }
}
