//! Serial-event hooks
//!
//! An application may register one callback per port. The scheduler calls
//! [`serial_event_run`] between iterations of its main loop and each hook
//! runs when its port has unread input. The engine itself never calls hooks.

use core::cell::RefCell;

use critical_section::Mutex;
use uart_core::{UartError, UartResult};

use crate::registry::{with_registry, PortId, PortRegistry, MAX_PORTS};

/// Serial-event callback
pub type EventHook = fn();

/// Optional callback per port id
pub struct EventHooks<const P: usize = MAX_PORTS> {
    hooks: [Option<EventHook>; P],
}

impl<const P: usize> EventHooks<P> {
    /// Create a table with no hooks
    pub const fn new() -> Self {
        Self { hooks: [None; P] }
    }

    /// Install the hook for `id`, replacing any earlier one
    pub fn set(&mut self, id: PortId, hook: EventHook) -> UartResult<()> {
        let slot = self
            .hooks
            .get_mut(usize::from(id.raw()))
            .ok_or(UartError::InvalidPort)?;
        *slot = Some(hook);
        Ok(())
    }

    /// Remove the hook for `id`
    pub fn clear(&mut self, id: PortId) {
        if let Some(slot) = self.hooks.get_mut(usize::from(id.raw())) {
            *slot = None;
        }
    }

    /// Hook installed for `id`
    pub fn get(&self, id: PortId) -> Option<EventHook> {
        self.hooks.get(usize::from(id.raw())).copied().flatten()
    }
}

impl<const P: usize> Default for EventHooks<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Call each port's hook when that port has unread input.
///
/// Ports without a hook, and hooks without a bound port, are skipped.
/// Returns the number of hooks called.
pub fn serial_event_run<const P: usize>(registry: &PortRegistry<P>, hooks: &EventHooks<P>) -> usize {
    let mut called = 0;
    for (id, port) in registry.iter() {
        if let Some(hook) = hooks.get(id) {
            if port.has_data() {
                hook();
                called += 1;
            }
        }
    }
    called
}

static HOOKS: Mutex<RefCell<EventHooks>> = Mutex::new(RefCell::new(EventHooks::new()));

/// Install a hook in the global table
pub fn set_event_hook(id: PortId, hook: EventHook) -> UartResult<()> {
    critical_section::with(|cs| HOOKS.borrow_ref_mut(cs).set(id, hook))
}

/// Remove a hook from the global table
pub fn clear_event_hook(id: PortId) {
    critical_section::with(|cs| HOOKS.borrow_ref_mut(cs).clear(id))
}

/// Run [`serial_event_run`] over the global registry and hook table.
///
/// Hooks are collected under the critical section and called outside it, so
/// a hook is free to read from its port and to write back.
pub fn run_serial_events() -> usize {
    let mut due: heapless::Vec<EventHook, MAX_PORTS> = heapless::Vec::new();
    with_registry(|registry| {
        critical_section::with(|cs| {
            let hooks = HOOKS.borrow_ref(cs);
            for (id, port) in registry.iter() {
                if let Some(hook) = hooks.get(id) {
                    if port.has_data() {
                        // One hook per port slot, so this cannot overflow
                        let _ = due.push(hook);
                    }
                }
            }
        })
    });

    for hook in &due {
        hook();
    }
    due.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use uart_engine::PortVectors;

    struct FlagPort(AtomicBool);

    impl PortVectors for FlagPort {
        fn on_rx_complete(&self) {
            self.0.store(true, Ordering::Relaxed);
        }

        fn on_tx_empty(&self) {}

        fn has_data(&self) -> bool {
            self.0.load(Ordering::Relaxed)
        }
    }

    static IDLE: FlagPort = FlagPort(AtomicBool::new(false));
    static BUSY: FlagPort = FlagPort(AtomicBool::new(true));

    static IDLE_CALLS: AtomicUsize = AtomicUsize::new(0);
    static BUSY_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn idle_hook() {
        IDLE_CALLS.fetch_add(1, Ordering::Relaxed);
    }

    fn busy_hook() {
        BUSY_CALLS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_only_ports_with_data_run_hooks() {
        let mut registry = PortRegistry::<4>::new();
        registry.bind(PortId(0), &IDLE).unwrap();
        registry.bind(PortId(2), &BUSY).unwrap();

        let mut hooks = EventHooks::<4>::new();
        hooks.set(PortId(0), idle_hook).unwrap();
        hooks.set(PortId(2), busy_hook).unwrap();
        // Hook with no bound port
        hooks.set(PortId(3), idle_hook).unwrap();

        assert_eq!(serial_event_run(&registry, &hooks), 1);
        assert_eq!(IDLE_CALLS.load(Ordering::Relaxed), 0);
        assert_eq!(BUSY_CALLS.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_hook_table_bounds() {
        let mut hooks = EventHooks::<2>::new();
        assert_eq!(hooks.set(PortId(2), idle_hook), Err(UartError::InvalidPort));

        hooks.set(PortId(1), idle_hook).unwrap();
        assert!(hooks.get(PortId(1)).is_some());
        hooks.clear(PortId(1));
        assert!(hooks.get(PortId(1)).is_none());
    }
}
