//! Hardware register boundary

use uart_core::FrameConfig;

/// Interrupt sources the engine drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartEvent {
    /// A byte has been received
    RxComplete,
    /// The transmit data register can take a new byte
    TxEmpty,
}

#[cfg(feature = "defmt")]
impl defmt::Format for UartEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            UartEvent::RxComplete => defmt::write!(fmt, "RxComplete"),
            UartEvent::TxEmpty => defmt::write!(fmt, "TxEmpty"),
        }
    }
}

/// Register-level access to one USART peripheral.
///
/// All methods take `&self`: the same register block is touched from
/// mainline code and from both interrupt handlers, exactly like volatile
/// memory-mapped I/O.
pub trait UartRegisters {
    /// Select the pin mux, make RX an input with pull-up and park TX high
    fn route_pins(&self);

    /// Switch the TX pin to output once the transmitter owns it
    fn drive_tx_pin(&self);

    /// Select double-speed (`true`) or normal-speed receive sampling
    fn set_double_speed(&self, enable: bool);

    /// Program the baud divisor register
    fn set_baud_divisor(&self, divisor: u16);

    /// Program the frame control register
    fn set_frame_format(&self, frame: FrameConfig);

    /// Enable or disable the receiver
    fn set_receiver(&self, enable: bool);

    /// Enable or disable the transmitter
    fn set_transmitter(&self, enable: bool);

    /// Enable or disable one interrupt source
    fn set_interrupt(&self, event: UartEvent, enable: bool);

    /// Check whether an interrupt source is enabled
    fn is_interrupt_enabled(&self, event: UartEvent) -> bool;

    /// Data-register-empty status flag
    fn is_tx_empty(&self) -> bool;

    /// Transmit-complete status flag: the last byte has fully left the line
    fn is_tx_complete(&self) -> bool;

    /// Clear the transmit-complete flag
    fn clear_tx_complete(&self);

    /// Load the transmit data register
    fn write_data(&self, byte: u8);

    /// Parity error status of the byte waiting in the receive data register
    fn has_parity_error(&self) -> bool;

    /// Read the receive data register, clearing the receive-complete flag
    fn read_data(&self) -> u8;

    /// Oscillator calibration in units of 1/1024
    fn calibration_trim(&self) -> i8 {
        0
    }
}

impl<T: UartRegisters + ?Sized> UartRegisters for &T {
    fn route_pins(&self) {
        (**self).route_pins()
    }
    fn drive_tx_pin(&self) {
        (**self).drive_tx_pin()
    }
    fn set_double_speed(&self, enable: bool) {
        (**self).set_double_speed(enable)
    }
    fn set_baud_divisor(&self, divisor: u16) {
        (**self).set_baud_divisor(divisor)
    }
    fn set_frame_format(&self, frame: FrameConfig) {
        (**self).set_frame_format(frame)
    }
    fn set_receiver(&self, enable: bool) {
        (**self).set_receiver(enable)
    }
    fn set_transmitter(&self, enable: bool) {
        (**self).set_transmitter(enable)
    }
    fn set_interrupt(&self, event: UartEvent, enable: bool) {
        (**self).set_interrupt(event, enable)
    }
    fn is_interrupt_enabled(&self, event: UartEvent) -> bool {
        (**self).is_interrupt_enabled(event)
    }
    fn is_tx_empty(&self) -> bool {
        (**self).is_tx_empty()
    }
    fn is_tx_complete(&self) -> bool {
        (**self).is_tx_complete()
    }
    fn clear_tx_complete(&self) {
        (**self).clear_tx_complete()
    }
    fn write_data(&self, byte: u8) {
        (**self).write_data(byte)
    }
    fn has_parity_error(&self) -> bool {
        (**self).has_parity_error()
    }
    fn read_data(&self) -> u8 {
        (**self).read_data()
    }
    fn calibration_trim(&self) -> i8 {
        (**self).calibration_trim()
    }
}
