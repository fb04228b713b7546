//! Vector dispatch and serial events against simulated ports
//! The global registry is shared by every test here, so each test owns its
//! own port ids.

use std::sync::atomic::{AtomicUsize, Ordering};

use uart_core::SERIAL_8N1;
use uart_engine::UartEngine;
use uart_port_sim::{SimUart, SIM_CLOCK_HZ};
use uart_registry::{
    bind_port, dispatch_vector, run_serial_events, set_event_hook, uart_vectors, unbind_port,
    with_registry, PortId, Vector,
};

type Port = UartEngine<&'static SimUart, 16, 8>;

static SIM0: SimUart = SimUart::new();
static SERIAL0: Port = UartEngine::new(&SIM0, SIM_CLOCK_HZ);

static SIM1: SimUart = SimUart::new();
static SERIAL1: Port = UartEngine::new(&SIM1, SIM_CLOCK_HZ);

static SIM2: SimUart = SimUart::new();
static SERIAL2: Port = UartEngine::new(&SIM2, SIM_CLOCK_HZ);

uart_vectors! {
    SERIAL1 => (USART1_RXC, USART1_DRE),
}

#[test]
fn test_dispatch_through_global_registry() {
    SERIAL0.begin(9600, SERIAL_8N1).unwrap();
    bind_port(PortId(0), &SERIAL0).unwrap();

    assert!(SIM0.receive(b'x', false));
    dispatch_vector(PortId(0), Vector::RxComplete).unwrap();
    assert_eq!(SERIAL0.read(), Some(b'x'));

    // Two bytes in the transmitter, one queued behind them
    SERIAL0.write_bytes(b"abc");
    SIM0.tick();
    dispatch_vector(PortId(0), Vector::TxEmpty).unwrap();
    SIM0.tick();
    SIM0.tick();
    assert_eq!(SIM0.wire(), b"abc");

    unbind_port(PortId(0)).unwrap();
    assert_eq!(
        dispatch_vector(PortId(0), Vector::RxComplete),
        Err(uart_core::UartError::PortNotBound)
    );
}

#[test]
fn test_generated_vectors_drive_port() {
    SERIAL1.begin(9600, SERIAL_8N1).unwrap();

    assert!(SIM1.receive(7, false));
    USART1_RXC();
    assert_eq!(SERIAL1.read(), Some(7));

    SERIAL1.write_bytes(&[1, 2, 3, 4]);
    while !SIM1.is_line_idle() || SIM1.tx_interrupt_pending() {
        if SIM1.tx_interrupt_pending() {
            critical_section::with(|_| USART1_DRE());
        }
        SIM1.tick();
    }
    assert_eq!(SIM1.wire(), &[1, 2, 3, 4]);
}

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn serial2_event() {
    HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    // Hooks run outside the registry lock and may use the port
    while let Some(byte) = SERIAL2.read() {
        SERIAL2.write(byte);
    }
}

#[test]
fn test_serial_event_hook_runs_on_input() {
    SERIAL2.begin(9600, SERIAL_8N1).unwrap();
    bind_port(PortId(2), &SERIAL2).unwrap();
    set_event_hook(PortId(2), serial2_event).unwrap();

    run_serial_events();
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);

    SIM2.receive(b'e', false);
    dispatch_vector(PortId(2), Vector::RxComplete).unwrap();
    run_serial_events();
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);

    SIM2.tick();
    assert_eq!(SIM2.wire(), b"e");

    // Input consumed, so the hook stays quiet
    run_serial_events();
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);
    assert!(with_registry(|registry| registry.is_bound(PortId(2))));
}
