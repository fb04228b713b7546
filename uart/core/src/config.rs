//! Build-time configuration constants

/// Default receive buffer size in slots (one slot is kept free)
pub const DEFAULT_RX_BUFFER_SIZE: usize = 64;

/// Default transmit buffer size in slots (one slot is kept free)
pub const DEFAULT_TX_BUFFER_SIZE: usize = 64;

/// Buffer size for parts with less than 1 KiB of RAM
pub const SMALL_RAM_BUFFER_SIZE: usize = 16;

/// Largest ring size whose indices fit in a single byte.
///
/// Rings with more slots need a wider index, which an 8-bit core reads in
/// more than one access; reads of such indices are taken with interrupts
/// masked.
pub const ATOMIC_INDEX_LIMIT: usize = 256;
