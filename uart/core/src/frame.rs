//! Frame format word
//!
//! The frame word is written verbatim to the peripheral's frame control
//! register on `begin`. The bit layout is that of an asynchronous USART
//! control register: character size in bits 0..=2, stop-bit mode in bit 3,
//! parity mode in bits 4..=5.

/// UART data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// UART parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

const CHSIZE_MASK: u16 = 0x07;
const SBMODE_TWO: u16 = 0x08;
const PMODE_MASK: u16 = 0x30;
const PMODE_EVEN: u16 = 0x20;
const PMODE_ODD: u16 = 0x30;

/// Frame configuration written to the hardware on `begin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameConfig(u16);

impl FrameConfig {
    /// Build a frame word from its parts
    pub const fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        let size = match data_bits {
            DataBits::Five => 0x00,
            DataBits::Six => 0x01,
            DataBits::Seven => 0x02,
            DataBits::Eight => 0x03,
        };
        let parity = match parity {
            Parity::None => 0x00,
            Parity::Even => PMODE_EVEN,
            Parity::Odd => PMODE_ODD,
        };
        let stop = match stop_bits {
            StopBits::One => 0x00,
            StopBits::Two => SBMODE_TWO,
        };
        Self(size | parity | stop)
    }

    /// Wrap a raw register value
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Decoded character size
    pub const fn data_bits(self) -> DataBits {
        match self.0 & CHSIZE_MASK {
            0x00 => DataBits::Five,
            0x01 => DataBits::Six,
            0x02 => DataBits::Seven,
            _ => DataBits::Eight,
        }
    }

    /// Decoded parity mode
    pub const fn parity(self) -> Parity {
        match self.0 & PMODE_MASK {
            PMODE_EVEN => Parity::Even,
            PMODE_ODD => Parity::Odd,
            _ => Parity::None,
        }
    }

    /// Decoded stop-bit mode
    pub const fn stop_bits(self) -> StopBits {
        if self.0 & SBMODE_TWO != 0 {
            StopBits::Two
        } else {
            StopBits::One
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        SERIAL_8N1
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameConfig {
    fn format(&self, fmt: defmt::Formatter) {
        let bits = match self.data_bits() {
            DataBits::Five => 5u8,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity() {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits() {
            StopBits::One => 1u8,
            StopBits::Two => 2,
        };
        defmt::write!(fmt, "{}{}{}", bits, parity, stop);
    }
}

macro_rules! frame_constants {
    ($($name:ident => ($bits:ident, $parity:ident, $stop:ident),)+) => {$(
        #[doc = concat!("Frame format `", stringify!($name), "`")]
        pub const $name: FrameConfig =
            FrameConfig::new(DataBits::$bits, Parity::$parity, StopBits::$stop);
    )+};
}

frame_constants! {
    SERIAL_5N1 => (Five, None, One),
    SERIAL_6N1 => (Six, None, One),
    SERIAL_7N1 => (Seven, None, One),
    SERIAL_8N1 => (Eight, None, One),
    SERIAL_5N2 => (Five, None, Two),
    SERIAL_6N2 => (Six, None, Two),
    SERIAL_7N2 => (Seven, None, Two),
    SERIAL_8N2 => (Eight, None, Two),
    SERIAL_5E1 => (Five, Even, One),
    SERIAL_6E1 => (Six, Even, One),
    SERIAL_7E1 => (Seven, Even, One),
    SERIAL_8E1 => (Eight, Even, One),
    SERIAL_5E2 => (Five, Even, Two),
    SERIAL_6E2 => (Six, Even, Two),
    SERIAL_7E2 => (Seven, Even, Two),
    SERIAL_8E2 => (Eight, Even, Two),
    SERIAL_5O1 => (Five, Odd, One),
    SERIAL_6O1 => (Six, Odd, One),
    SERIAL_7O1 => (Seven, Odd, One),
    SERIAL_8O1 => (Eight, Odd, One),
    SERIAL_5O2 => (Five, Odd, Two),
    SERIAL_6O2 => (Six, Odd, Two),
    SERIAL_7O2 => (Seven, Odd, Two),
    SERIAL_8O2 => (Eight, Odd, Two),
}
