//! `embedded-io` and `core::fmt` adapters

use core::convert::Infallible;
use core::fmt;

use embedded_io::{ErrorType, Read, ReadReady, Write, WriteReady};

use crate::{UartEngine, UartRegisters};

impl<R, const RX: usize, const TX: usize> UartEngine<R, RX, TX>
where
    R: UartRegisters,
{
    /// Wait for at least one byte, then take what is there
    fn read_blocking(&self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        while !self.has_data() {
            core::hint::spin_loop();
        }
        self.read_available(buf)
    }
}

macro_rules! impl_io {
    ($($ty:ty),+) => {$(
        impl<R, const RX: usize, const TX: usize> ErrorType for $ty
        where
            R: UartRegisters,
        {
            type Error = Infallible;
        }

        impl<R, const RX: usize, const TX: usize> Read for $ty
        where
            R: UartRegisters,
        {
            fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                Ok(self.read_blocking(buf))
            }
        }

        impl<R, const RX: usize, const TX: usize> ReadReady for $ty
        where
            R: UartRegisters,
        {
            fn read_ready(&mut self) -> Result<bool, Self::Error> {
                Ok(self.has_data())
            }
        }

        impl<R, const RX: usize, const TX: usize> Write for $ty
        where
            R: UartRegisters,
        {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                Ok(self.write_bytes(buf))
            }

            fn flush(&mut self) -> Result<(), Self::Error> {
                UartEngine::<R, RX, TX>::flush(self);
                Ok(())
            }
        }

        impl<R, const RX: usize, const TX: usize> WriteReady for $ty
        where
            R: UartRegisters,
        {
            fn write_ready(&mut self) -> Result<bool, Self::Error> {
                Ok(self.available_for_write() > 0)
            }
        }

        impl<R, const RX: usize, const TX: usize> fmt::Write for $ty
        where
            R: UartRegisters,
        {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.write_bytes(s.as_bytes());
                Ok(())
            }
        }
    )+};
}

impl_io!(UartEngine<R, RX, TX>, &UartEngine<R, RX, TX>);
