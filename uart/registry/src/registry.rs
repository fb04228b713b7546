//! Port registry for interrupt vector dispatch

use core::cell::RefCell;

use critical_section::Mutex;
use log::debug;
use uart_core::{UartError, UartResult};
use uart_engine::PortVectors;

/// Number of USART instances on the largest supported part
pub const MAX_PORTS: usize = 4;

/// Hardware port number (USART0, USART1, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortId(pub u8);

impl PortId {
    /// Create a new port id
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw port number
    pub const fn raw(self) -> u8 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PortId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "USART{}", self.0);
    }
}

/// The two interrupt vectors each port owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vector {
    /// Receive complete
    RxComplete,
    /// Transmit data register empty
    TxEmpty,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Vector {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Vector::RxComplete => defmt::write!(fmt, "RxComplete"),
            Vector::TxEmpty => defmt::write!(fmt, "TxEmpty"),
        }
    }
}

/// Table of bound ports indexed by port id
pub struct PortRegistry<const P: usize = MAX_PORTS> {
    ports: [Option<&'static dyn PortVectors>; P],
}

impl<const P: usize> PortRegistry<P> {
    /// Create a new empty registry
    pub const fn new() -> Self {
        const NONE: Option<&'static dyn PortVectors> = None;
        Self { ports: [NONE; P] }
    }

    /// Bind a port to its hardware id
    ///
    /// Returns an error if the id is out of range or already bound
    pub fn bind(&mut self, id: PortId, port: &'static dyn PortVectors) -> UartResult<()> {
        let slot = self.ports.get_mut(id.index()).ok_or(UartError::InvalidPort)?;
        if slot.is_some() {
            return Err(UartError::PortInUse);
        }

        *slot = Some(port);
        debug!("uart: bound port {}", id.raw());
        Ok(())
    }

    /// Remove the port bound to `id`
    pub fn unbind(&mut self, id: PortId) -> UartResult<()> {
        let slot = self.ports.get_mut(id.index()).ok_or(UartError::InvalidPort)?;
        if slot.take().is_some() {
            debug!("uart: unbound port {}", id.raw());
        }
        Ok(())
    }

    /// Get the port bound to `id`
    pub fn get(&self, id: PortId) -> Option<&'static dyn PortVectors> {
        self.ports.get(id.index()).copied().flatten()
    }

    /// Check if a port is bound to `id`
    pub fn is_bound(&self, id: PortId) -> bool {
        self.get(id).is_some()
    }

    /// Run the handler for `vector` on the port bound to `id`
    pub fn dispatch(&self, id: PortId, vector: Vector) -> UartResult<()> {
        if id.index() >= P {
            return Err(UartError::InvalidPort);
        }
        let port = self.get(id).ok_or(UartError::PortNotBound)?;

        match vector {
            Vector::RxComplete => port.on_rx_complete(),
            Vector::TxEmpty => port.on_tx_empty(),
        }
        Ok(())
    }

    /// Ids of all bound ports, lowest first
    pub fn bound_ports(&self) -> heapless::Vec<PortId, P> {
        let mut ids = heapless::Vec::new();
        for (index, slot) in self.ports.iter().enumerate() {
            if slot.is_some() {
                // At most P slots, so the push cannot fail
                let _ = ids.push(PortId(index as u8));
            }
        }
        ids
    }

    /// Iterate over all bound ports with their ids
    pub fn iter(&self) -> impl Iterator<Item = (PortId, &'static dyn PortVectors)> + '_ {
        self.ports
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|port| (PortId(index as u8), port)))
    }
}

impl<const P: usize> Default for PortRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Global static registry instance
static REGISTRY: Mutex<RefCell<PortRegistry>> = Mutex::new(RefCell::new(PortRegistry::new()));

/// Get access to the global port registry
pub fn with_registry<F, T>(f: F) -> T
where
    F: FnOnce(&mut PortRegistry) -> T,
{
    critical_section::with(|cs| {
        let mut registry = REGISTRY.borrow_ref_mut(cs);
        f(&mut registry)
    })
}

/// Bind a port in the global registry
pub fn bind_port(id: PortId, port: &'static dyn PortVectors) -> UartResult<()> {
    with_registry(|registry| registry.bind(id, port))
}

/// Unbind a port from the global registry
pub fn unbind_port(id: PortId) -> UartResult<()> {
    with_registry(|registry| registry.unbind(id))
}

/// Run an interrupt vector through the global registry
pub fn dispatch_vector(id: PortId, vector: Vector) -> UartResult<()> {
    with_registry(|registry| registry.dispatch(id, vector))
}
