//! Serial echo on a simulated USART0
//!
//! Input bytes arrive through the receive vector, the serial-event hook
//! echoes them back upper-cased, and the transmit vector drains the output
//! onto the simulated wire. Run with `RUST_LOG=debug` to see the engine's
//! lifecycle and drop messages.

use log::{info, warn};
use uart_core::SERIAL_8N1;
use uart_engine::UartEngine;
use uart_port_sim::{SimUart, SIM_CLOCK_HZ};
use uart_registry::{bind_port, run_serial_events, set_event_hook, uart_vectors, PortId};

const BAUD: u32 = 115_200;
const USART0: PortId = PortId::new(0);

static SIM0: SimUart = SimUart::new();
static SERIAL0: UartEngine<&'static SimUart, 16, 16> = UartEngine::new(&SIM0, SIM_CLOCK_HZ);

uart_vectors! {
    SERIAL0 => (USART0_RXC, USART0_DRE),
}

/// Echo whatever is waiting on USART0
fn serial_event0() {
    while let Some(byte) = SERIAL0.read() {
        SERIAL0.write(byte.to_ascii_uppercase());
    }
}

/// Raise the vectors the simulated hardware has pending
fn service_interrupts() {
    critical_section::with(|_| {
        if SIM0.rx_interrupt_pending() {
            USART0_RXC();
        }
        if SIM0.tx_interrupt_pending() {
            USART0_DRE();
        }
    });
}

fn main() {
    env_logger::init();

    if let Err(e) = SERIAL0.begin(BAUD, SERIAL_8N1) {
        warn!("USART0 configuration failed: {}", e);
        return;
    }
    if let Err(e) = bind_port(USART0, &SERIAL0).and_then(|()| set_event_hook(USART0, serial_event0)) {
        warn!("USART0 binding failed: {}", e);
        return;
    }
    info!("USART0 up at {} baud", BAUD);

    let input = b"hello from the other side\n";
    for &byte in input {
        SIM0.receive(byte, false);
        service_interrupts();

        let hooks = run_serial_events();
        log::trace!("serial events: {}", hooks);

        service_interrupts();
        SIM0.tick();
    }

    while !SIM0.is_line_idle() || SIM0.tx_interrupt_pending() {
        service_interrupts();
        SIM0.tick();
    }
    SERIAL0.end();

    let echoed = SIM0.take_wire();
    info!("echoed {} of {} bytes", echoed.len(), input.len());
    println!("{}", String::from_utf8_lossy(&echoed).trim_end());
}
