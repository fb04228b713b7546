//! Simulated USART register block

use std::sync::{Mutex, MutexGuard, PoisonError};

use uart_core::{FrameConfig, SERIAL_8N1};
use uart_engine::{UartEvent, UartRegisters};

struct SimState {
    rx_enabled: bool,
    tx_enabled: bool,
    rxc_ie: bool,
    dre_ie: bool,
    double_speed: bool,
    divisor: u16,
    frame: FrameConfig,
    pins_routed: bool,
    tx_pin_output: bool,
    /// Transmit data register
    data: Option<u8>,
    /// Byte currently being shifted onto the line
    shifter: Option<u8>,
    /// Transmit-complete flag
    txc: bool,
    /// Receive data register and its parity error bit
    rx_data: Option<(u8, bool)>,
    /// Bytes that fully left the line
    wire: Vec<u8>,
    free_running: bool,
    trim: i8,
}

impl SimState {
    /// Finish the byte in the shift register
    fn shift_out(&mut self) -> Option<u8> {
        let byte = self.shifter.take()?;
        self.wire.push(byte);
        self.shifter = self.data.take();
        if self.shifter.is_none() {
            self.txc = true;
        }
        Some(byte)
    }

    fn clock_if_free_running(&mut self) {
        if self.free_running {
            self.shift_out();
        }
    }
}

/// One simulated USART
pub struct SimUart {
    state: Mutex<SimState>,
}

impl SimUart {
    /// Create a powered-up, unconfigured USART
    pub const fn new() -> Self {
        Self::with_trim(0)
    }

    /// Create a USART whose oscillator calibration reads `trim`
    pub const fn with_trim(trim: i8) -> Self {
        Self {
            state: Mutex::new(SimState {
                rx_enabled: false,
                tx_enabled: false,
                rxc_ie: false,
                dre_ie: false,
                double_speed: false,
                divisor: 0,
                frame: SERIAL_8N1,
                pins_routed: false,
                tx_pin_output: false,
                data: None,
                shifter: None,
                txc: false,
                rx_data: None,
                wire: Vec::new(),
                free_running: false,
                trim,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Let every status-flag read also finish one byte on the line.
    ///
    /// Single-threaded code that spins on the flags then always terminates.
    pub fn set_free_running(&self, enable: bool) {
        self.lock().free_running = enable;
    }

    /// Finish the byte in the shift register and return it
    pub fn tick(&self) -> Option<u8> {
        self.lock().shift_out()
    }

    /// Bytes transmitted so far
    pub fn wire(&self) -> Vec<u8> {
        self.lock().wire.clone()
    }

    /// Take the transmitted bytes, leaving the log empty
    pub fn take_wire(&self) -> Vec<u8> {
        std::mem::take(&mut self.lock().wire)
    }

    /// Neither the shift register nor the data register holds a byte
    pub fn is_line_idle(&self) -> bool {
        let state = self.lock();
        state.shifter.is_none() && state.data.is_none()
    }

    /// Bytes held by the transmitter: shift register plus data register
    pub fn in_flight(&self) -> usize {
        let state = self.lock();
        usize::from(state.shifter.is_some()) + usize::from(state.data.is_some())
    }

    /// Data-empty interrupt is enabled and its flag is set
    pub fn tx_interrupt_pending(&self) -> bool {
        let state = self.lock();
        state.dre_ie && state.data.is_none()
    }

    /// Receive-complete interrupt is enabled and a byte is waiting
    pub fn rx_interrupt_pending(&self) -> bool {
        let state = self.lock();
        state.rxc_ie && state.rx_data.is_some()
    }

    /// A byte arrives on the RX line. Ignored while the receiver is off.
    pub fn receive(&self, byte: u8, parity_error: bool) -> bool {
        let mut state = self.lock();
        if !state.rx_enabled {
            return false;
        }
        state.rx_data = Some((byte, parity_error));
        true
    }

    /// Current baud register
    pub fn divisor(&self) -> u16 {
        self.lock().divisor
    }

    /// Current frame control register
    pub fn frame(&self) -> FrameConfig {
        self.lock().frame
    }

    /// Receiver enable bit
    pub fn receiver_enabled(&self) -> bool {
        self.lock().rx_enabled
    }

    /// Transmitter enable bit
    pub fn transmitter_enabled(&self) -> bool {
        self.lock().tx_enabled
    }

    /// Double-speed receive bit
    pub fn double_speed(&self) -> bool {
        self.lock().double_speed
    }

    /// Pin mux routed and TX pin switched to output
    pub fn pins(&self) -> (bool, bool) {
        let state = self.lock();
        (state.pins_routed, state.tx_pin_output)
    }
}

impl Default for SimUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartRegisters for SimUart {
    fn route_pins(&self) {
        self.lock().pins_routed = true;
    }

    fn drive_tx_pin(&self) {
        self.lock().tx_pin_output = true;
    }

    fn set_double_speed(&self, enable: bool) {
        self.lock().double_speed = enable;
    }

    fn set_baud_divisor(&self, divisor: u16) {
        self.lock().divisor = divisor;
    }

    fn set_frame_format(&self, frame: FrameConfig) {
        self.lock().frame = frame;
    }

    fn set_receiver(&self, enable: bool) {
        let mut state = self.lock();
        state.rx_enabled = enable;
        if !enable {
            state.rx_data = None;
        }
    }

    fn set_transmitter(&self, enable: bool) {
        self.lock().tx_enabled = enable;
    }

    fn set_interrupt(&self, event: UartEvent, enable: bool) {
        let mut state = self.lock();
        match event {
            UartEvent::RxComplete => state.rxc_ie = enable,
            UartEvent::TxEmpty => state.dre_ie = enable,
        }
    }

    fn is_interrupt_enabled(&self, event: UartEvent) -> bool {
        let state = self.lock();
        match event {
            UartEvent::RxComplete => state.rxc_ie,
            UartEvent::TxEmpty => state.dre_ie,
        }
    }

    fn is_tx_empty(&self) -> bool {
        let mut state = self.lock();
        state.clock_if_free_running();
        state.data.is_none()
    }

    fn is_tx_complete(&self) -> bool {
        let mut state = self.lock();
        state.clock_if_free_running();
        state.txc
    }

    fn clear_tx_complete(&self) {
        self.lock().txc = false;
    }

    fn write_data(&self, byte: u8) {
        let mut state = self.lock();
        if state.shifter.is_none() {
            state.shifter = Some(byte);
        } else {
            if state.data.is_some() {
                log::warn!("sim: transmit data register overwritten");
            }
            state.data = Some(byte);
        }
    }

    fn has_parity_error(&self) -> bool {
        self.lock().rx_data.map_or(false, |(_, parity_error)| parity_error)
    }

    fn read_data(&self) -> u8 {
        self.lock().rx_data.take().map_or(0, |(byte, _)| byte)
    }

    fn calibration_trim(&self) -> i8 {
        self.lock().trim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_goes_to_shifter_then_data_register() {
        let sim = SimUart::new();

        sim.write_data(1);
        assert!(sim.is_tx_empty());
        sim.write_data(2);
        assert!(!sim.is_tx_empty());

        assert_eq!(sim.tick(), Some(1));
        assert!(sim.is_tx_empty());
        assert!(!sim.is_tx_complete());
        assert_eq!(sim.tick(), Some(2));
        assert!(sim.is_tx_complete());
        assert_eq!(sim.tick(), None);
        assert_eq!(sim.wire(), vec![1, 2]);
    }

    #[test]
    fn test_transmit_complete_starts_clear() {
        let sim = SimUart::new();
        assert!(!sim.is_tx_complete());
        assert!(sim.is_line_idle());
    }

    #[test]
    fn test_free_running_clocks_on_status_read() {
        let sim = SimUart::new();
        sim.set_free_running(true);
        sim.write_data(7);

        assert!(sim.is_tx_complete());
        assert_eq!(sim.wire(), vec![7]);
    }

    #[test]
    fn test_receive_needs_receiver() {
        let sim = SimUart::new();
        assert!(!sim.receive(1, false));

        sim.set_receiver(true);
        assert!(sim.receive(2, true));
        assert!(sim.has_parity_error());
        assert_eq!(sim.read_data(), 2);
        assert!(!sim.has_parity_error());
    }
}
